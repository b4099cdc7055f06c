//! Deep links into the external messaging app.

use serde::{Deserialize, Serialize};

use crate::domain::inquiry::ContactInquiry;
use crate::domain::quote::{Quote, QuoteInput};
use crate::errors::DomainError;
use crate::summary::{inquiry_summary, quote_summary, SummaryCopy};

pub const DEFAULT_MESSAGING_BASE_URL: &str = "https://wa.me";
pub const DEFAULT_RECIPIENT_ID: &str = "4917624200179";

/// Canned first message offered by the exit-intent dialog.
pub const EXIT_INTENT_PROMPT: &str =
    "Hi Christian, ich war gerade auf deiner Website und habe eine kurze Frage...";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingLink {
    pub base_url: String,
    pub recipient_id: String,
}

impl Default for MessagingLink {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGING_BASE_URL, DEFAULT_RECIPIENT_ID)
    }
}

impl MessagingLink {
    pub fn new(base_url: impl Into<String>, recipient_id: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), recipient_id: recipient_id.into() }
    }

    /// Link that opens a chat without a prefilled message.
    pub fn contact_link(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.recipient_id)
    }

    /// `{base}/{recipient}?text={percent-encoded text}`.
    pub fn prefilled(&self, text: &str) -> String {
        if text.is_empty() {
            return self.contact_link();
        }
        format!("{}?text={}", self.contact_link(), urlencoding::encode(text))
    }

    pub fn quote_link(&self, input: &QuoteInput, quote: &Quote, copy: &SummaryCopy) -> String {
        let link = self.prefilled(&quote_summary(input, quote, copy));
        tracing::debug!(
            event_name = "handoff.quote_link.built",
            total = quote.total,
            link_length = link.len(),
            "quote handoff link built"
        );
        link
    }

    pub fn inquiry_link(&self, inquiry: &ContactInquiry) -> Result<String, DomainError> {
        inquiry.validate()?;
        Ok(self.prefilled(&inquiry_summary(inquiry)))
    }

    pub fn exit_intent_link(&self) -> String {
        self.prefilled(EXIT_INTENT_PROMPT)
    }
}
