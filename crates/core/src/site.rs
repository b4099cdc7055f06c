use serde::{Deserialize, Serialize};

use crate::gate::GateOutcome;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Home,
    Impressum,
    Datenschutz,
    Agb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteEvent {
    Navigate(View),
    OpenContact,
    CloseContact,
    ExitIntent(GateOutcome),
    CloseExitIntent,
}

/// Top-level page state. Owned by the root view; children receive events
/// back instead of mutating shared state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteState {
    pub view: View,
    pub contact_open: bool,
    pub exit_intent_open: bool,
}

impl SiteState {
    /// Returns whether the state changed.
    pub fn apply(&mut self, event: SiteEvent) -> bool {
        let before = self.clone();
        match event {
            SiteEvent::Navigate(view) => {
                self.view = view;
                self.contact_open = false;
                self.exit_intent_open = false;
            }
            SiteEvent::OpenContact => {
                self.contact_open = true;
                self.exit_intent_open = false;
            }
            SiteEvent::CloseContact => self.contact_open = false,
            // The gate has already spent its single show; never drop it.
            SiteEvent::ExitIntent(GateOutcome::Show) => self.exit_intent_open = true,
            SiteEvent::ExitIntent(GateOutcome::Ignored) => {}
            SiteEvent::CloseExitIntent => self.exit_intent_open = false,
        }
        *self != before
    }

    pub fn any_modal_open(&self) -> bool {
        self.contact_open || self.exit_intent_open
    }
}

#[cfg(test)]
mod tests {
    use super::{SiteEvent, SiteState, View};
    use crate::gate::{ExitIntentGate, GateOutcome, InMemorySessionStore, PointerExit};

    #[test]
    fn navigation_closes_open_dialogs() {
        let mut site = SiteState::default();
        assert!(site.apply(SiteEvent::OpenContact));
        assert!(site.any_modal_open());

        assert!(site.apply(SiteEvent::Navigate(View::Impressum)));
        assert_eq!(site.view, View::Impressum);
        assert!(!site.any_modal_open());
    }

    #[test]
    fn exit_intent_opens_even_while_contact_dialog_is_open() {
        let mut gate = ExitIntentGate::new(InMemorySessionStore::default());
        let mut site = SiteState::default();
        site.apply(SiteEvent::OpenContact);

        let first = gate.on_pointer_exit(PointerExit { client_y: 1.0 });
        assert_eq!(first, GateOutcome::Show);
        assert!(site.apply(SiteEvent::ExitIntent(first)));
        assert!(site.exit_intent_open);

        site.apply(SiteEvent::CloseContact);
        let second = gate.on_pointer_exit(PointerExit { client_y: 1.0 });
        assert_eq!(second, GateOutcome::Ignored);
        assert!(!site.apply(SiteEvent::ExitIntent(second)));
        assert!(site.exit_intent_open);
    }

    #[test]
    fn agb_is_a_routable_view() {
        let mut site = SiteState::default();
        assert!(site.apply(SiteEvent::Navigate(View::Agb)));
        assert_eq!(site.view, View::Agb);
    }

    #[test]
    fn ignored_gate_outcome_is_a_no_op() {
        let mut site = SiteState::default();
        assert!(!site.apply(SiteEvent::ExitIntent(GateOutcome::Ignored)));
        assert!(site.apply(SiteEvent::ExitIntent(GateOutcome::Show)));
        assert!(site.apply(SiteEvent::CloseExitIntent));
        assert_eq!(site, SiteState::default());
    }
}
