use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

pub const MIN_BUDGET: u32 = 250;
pub const MAX_BUDGET: u32 = 5000;
pub const BUDGET_STEP: u32 = 50;
pub const DEFAULT_BUDGET: u32 = 1500;

/// Project request collected by the contact dialog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInquiry {
    pub name: String,
    pub budget: u32,
    pub message: String,
}

impl Default for ContactInquiry {
    fn default() -> Self {
        Self { name: String::new(), budget: DEFAULT_BUDGET, message: String::new() }
    }
}

impl ContactInquiry {
    pub fn new(name: impl Into<String>, budget: i64, message: impl Into<String>) -> Self {
        Self { name: name.into(), budget: snap_budget(budget), message: message.into() }
    }

    pub fn set_budget(&mut self, raw: i64) {
        self.budget = snap_budget(raw);
    }

    /// The slider's top value means "this much or more".
    pub fn budget_is_open_ended(&self) -> bool {
        self.budget >= MAX_BUDGET
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::MissingField("name"));
        }
        if self.message.trim().is_empty() {
            return Err(DomainError::MissingField("message"));
        }
        Ok(())
    }

    /// Back to the dialog's initial state after a submit.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn snap_budget(raw: i64) -> u32 {
    let clamped = raw.clamp(i64::from(MIN_BUDGET), i64::from(MAX_BUDGET));
    let step = i64::from(BUDGET_STEP);
    let offset = clamped - i64::from(MIN_BUDGET);
    let snapped = i64::from(MIN_BUDGET) + ((offset + step / 2) / step) * step;
    snapped.min(i64::from(MAX_BUDGET)) as u32
}

#[cfg(test)]
mod tests {
    use super::{ContactInquiry, DEFAULT_BUDGET, MAX_BUDGET, MIN_BUDGET};
    use crate::errors::DomainError;

    #[test]
    fn budget_is_clamped_and_snapped_to_slider_steps() {
        assert_eq!(ContactInquiry::new("A", 0, "m").budget, MIN_BUDGET);
        assert_eq!(ContactInquiry::new("A", 99_999, "m").budget, MAX_BUDGET);
        assert_eq!(ContactInquiry::new("A", 1_520, "m").budget, 1_500);
        assert_eq!(ContactInquiry::new("A", 1_525, "m").budget, 1_550);
        assert_eq!(ContactInquiry::new("A", 4_990, "m").budget, 5_000);
    }

    #[test]
    fn max_budget_is_open_ended() {
        assert!(ContactInquiry::new("A", 5_000, "m").budget_is_open_ended());
        assert!(!ContactInquiry::new("A", 4_950, "m").budget_is_open_ended());
    }

    #[test]
    fn blank_required_fields_fail_validation() {
        let missing_name = ContactInquiry::new("   ", 1_000, "Hallo");
        assert_eq!(missing_name.validate(), Err(DomainError::MissingField("name")));

        let missing_message = ContactInquiry::new("Lena", 1_000, "\n");
        assert_eq!(missing_message.validate(), Err(DomainError::MissingField("message")));

        assert!(ContactInquiry::new("Lena", 1_000, "Neue Seite").validate().is_ok());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut inquiry = ContactInquiry::new("Lena", 3_000, "Shop");
        inquiry.reset();
        assert_eq!(inquiry, ContactInquiry::default());
        assert_eq!(inquiry.budget, DEFAULT_BUDGET);
    }
}
