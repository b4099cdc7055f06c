//! Exit-intent gate: shows the "before you go" dialog at most once per
//! browser session.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_KEY: &str = "vamela_exit_intent_shown";
pub const DEFAULT_THRESHOLD_PX: f64 = 20.0;

/// Session-scoped boolean flags.
pub trait SessionStore {
    fn flag(&self, key: &str) -> bool;
    fn set_flag(&mut self, key: &str);
}

#[derive(Clone, Debug, Default)]
pub struct InMemorySessionStore {
    flags: HashMap<String, bool>,
}

impl SessionStore for InMemorySessionStore {
    fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    fn set_flag(&mut self, key: &str) {
        self.flags.insert(key.to_string(), true);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateState {
    NotShown,
    Shown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateOutcome {
    Show,
    Ignored,
}

/// Pointer leaving the document, with its last vertical position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerExit {
    pub client_y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GateSettings {
    pub session_key: String,
    pub threshold_px: f64,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self { session_key: DEFAULT_SESSION_KEY.to_string(), threshold_px: DEFAULT_THRESHOLD_PX }
    }
}

pub struct ExitIntentGate<S> {
    store: S,
    settings: GateSettings,
    state: GateState,
}

impl<S> ExitIntentGate<S>
where
    S: SessionStore,
{
    pub fn new(store: S) -> Self {
        Self::with_settings(store, GateSettings::default())
    }

    /// Seeds the state from the session flag.
    pub fn with_settings(store: S, settings: GateSettings) -> Self {
        let state =
            if store.flag(&settings.session_key) { GateState::Shown } else { GateState::NotShown };
        Self { store, settings, state }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn on_pointer_exit(&mut self, event: PointerExit) -> GateOutcome {
        let above_line =
            event.client_y.is_finite() && event.client_y < self.settings.threshold_px;
        if self.state == GateState::Shown || !above_line {
            return GateOutcome::Ignored;
        }

        self.state = GateState::Shown;
        self.store.set_flag(&self.settings.session_key);
        tracing::info!(
            event_name = "gate.exit_intent.shown",
            client_y = event.client_y,
            "exit intent dialog triggered"
        );
        GateOutcome::Show
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
