//! Plain-text summaries handed to the messaging collaborator.
//!
//! Output is human readable and unencoded; [`crate::handoff`] takes care of
//! percent-encoding before anything ends up in a URL.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::Catalog;
use crate::domain::inquiry::ContactInquiry;
use crate::domain::quote::{Quote, QuoteInput};

const NO_FEATURES: &str = "Keine";
const RULE: &str = "--------------------";

/// Copy used around the quote summary. Text variants live here instead of
/// in separate formatters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCopy {
    pub greeting_name: String,
    pub intro: String,
    pub closing: String,
}

impl Default for SummaryCopy {
    fn default() -> Self {
        Self {
            greeting_name: "Christian".to_string(),
            intro: "ich habe den Preiskalkulator genutzt:".to_string(),
            closing: "Ich würde gerne darüber sprechen.".to_string(),
        }
    }
}

impl SummaryCopy {
    pub fn for_recipient(greeting_name: impl Into<String>) -> Self {
        Self { greeting_name: greeting_name.into(), ..Self::default() }
    }
}

pub fn quote_summary(input: &QuoteInput, quote: &Quote, copy: &SummaryCopy) -> String {
    quote_summary_with_catalog(&Catalog::default(), input, quote, copy)
}

pub fn quote_summary_with_catalog(
    catalog: &Catalog,
    input: &QuoteInput,
    quote: &Quote,
    copy: &SummaryCopy,
) -> String {
    let tier_label = catalog.tier(input.tier).summary_label;

    let features = input
        .selected_features
        .iter()
        .map(|key| catalog.feature(*key).summary_label)
        .collect::<Vec<_>>();
    let features = if features.is_empty() { NO_FEATURES.to_string() } else { features.join(", ") };

    [
        format!("Hi {}, {}", copy.greeting_name, copy.intro),
        format!("• {} Unterseiten", input.page_count.get()),
        format!("• Design: {tier_label}"),
        format!("• Extras: {features}"),
        RULE.to_string(),
        format!("Geschätzter Preis: ca. {}", format_eur(quote.total)),
        String::new(),
        copy.closing.clone(),
    ]
    .join("\n")
}

pub fn inquiry_summary(inquiry: &ContactInquiry) -> String {
    [
        "🤖 *Neue Projektanfrage via Website*".to_string(),
        String::new(),
        format!("👤 *Name:* {}", inquiry.name.trim()),
        format!("💰 *Budget:* ca. {}", format_eur(u64::from(inquiry.budget))),
        String::new(),
        "💬 *Nachricht:*".to_string(),
        inquiry.message.trim().to_string(),
    ]
    .join("\n")
}

/// `1050` → `1.050€`.
pub fn format_eur(amount: u64) -> String {
    format!("{}€", group_thousands(amount))
}

/// German digit grouping: `.` every three digits, no decimals.
pub fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}
