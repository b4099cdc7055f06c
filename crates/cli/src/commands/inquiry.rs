use serde::Serialize;
use vamela_core::config::{AppConfig, LoadOptions};
use vamela_core::summary::{format_eur, inquiry_summary};
use vamela_core::ContactInquiry;

use crate::commands::{config_failure, CommandResult, EXIT_VALIDATION};

#[derive(Debug, Clone, Default)]
pub struct InquiryArgs {
    pub name: String,
    pub budget: Option<i64>,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct InquiryReport {
    budget: u32,
    budget_display: String,
    summary: String,
    link: String,
}

pub fn run(args: &InquiryArgs) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return config_failure("inquiry", error),
    };

    let mut inquiry = ContactInquiry {
        name: args.name.clone(),
        message: args.message.clone(),
        ..ContactInquiry::default()
    };
    if let Some(budget) = args.budget {
        inquiry.set_budget(budget);
    }

    let link = match config.messaging_link().inquiry_link(&inquiry) {
        Ok(link) => link,
        Err(error) => {
            return CommandResult::failure(
                "inquiry",
                "validation",
                error.to_string(),
                EXIT_VALIDATION,
            );
        }
    };

    CommandResult::report(
        "inquiry",
        &InquiryReport {
            budget: inquiry.budget,
            budget_display: budget_display(&inquiry),
            summary: inquiry_summary(&inquiry),
            link,
        },
    )
}

/// Slider label; the capped budget reads as open-ended.
fn budget_display(inquiry: &ContactInquiry) -> String {
    let amount = format_eur(u64::from(inquiry.budget));
    if inquiry.budget_is_open_ended() {
        format!("{amount}+")
    } else {
        amount
    }
}
