use serde::Serialize;
use vamela_core::config::{AppConfig, LoadOptions};
use vamela_core::summary::{format_eur, quote_summary};
use vamela_core::{estimate, FeatureKey, PricingTraceStep, QuoteInput, TierId};

use crate::commands::{config_failure, CommandResult, EXIT_VALIDATION};

#[derive(Debug, Clone)]
pub struct QuoteArgs {
    pub pages: i64,
    pub tier: String,
    pub features: Vec<String>,
}

impl Default for QuoteArgs {
    fn default() -> Self {
        Self { pages: 1, tier: TierId::Standard.to_string(), features: Vec::new() }
    }
}

#[derive(Debug, Serialize)]
struct QuoteReport {
    pages: u8,
    tier: TierId,
    features: Vec<String>,
    ignored_features: Vec<String>,
    total: u64,
    total_display: String,
    breakdown: Vec<PricingTraceStep>,
    summary: String,
    link: String,
}

pub fn run(args: &QuoteArgs) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return config_failure("quote", error),
    };

    let tier = match args.tier.parse::<TierId>() {
        Ok(tier) => tier,
        Err(error) => {
            return CommandResult::failure("quote", "validation", error.to_string(), EXIT_VALIDATION)
        }
    };

    let mut input = QuoteInput::new(args.pages, tier);
    input.select_feature_keys(args.features.iter().map(String::as_str));
    let ignored_features = args
        .features
        .iter()
        .filter(|raw| FeatureKey::parse(raw).is_none())
        .cloned()
        .collect();

    let quote = estimate(&input);
    let copy = config.summary_copy();
    let report = QuoteReport {
        pages: input.page_count.get(),
        tier,
        features: input.selected_features.iter().map(ToString::to_string).collect(),
        ignored_features,
        total: quote.total,
        total_display: format_eur(quote.total),
        summary: quote_summary(&input, &quote, &copy),
        link: config.messaging_link().quote_link(&input, &quote, &copy),
        breakdown: quote.breakdown,
    };

    CommandResult::report("quote", &report)
}
