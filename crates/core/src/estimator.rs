use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::catalog::Catalog;
use crate::domain::quote::{PricingTraceStep, Quote, QuoteInput};

pub trait PricingEngine: Send + Sync {
    fn estimate(&self, input: &QuoteInput) -> Quote;
}

#[derive(Clone, Debug, Default)]
pub struct DeterministicPricingEngine {
    catalog: Catalog,
}

impl DeterministicPricingEngine {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl PricingEngine for DeterministicPricingEngine {
    fn estimate(&self, input: &QuoteInput) -> Quote {
        estimate_with_catalog(&self.catalog, input)
    }
}

pub fn estimate(input: &QuoteInput) -> Quote {
    estimate_with_catalog(&Catalog::default(), input)
}

/// `total = round((base + pages * per_page + surcharges) * multiplier)`.
pub fn estimate_with_catalog(catalog: &Catalog, input: &QuoteInput) -> Quote {
    let pages = input.page_count;
    let mut steps = Vec::with_capacity(input.selected_features.len() + 3);

    let base = catalog.base_price();
    steps.push(PricingTraceStep {
        stage: "base".to_string(),
        detail: "setup & design".to_string(),
        amount: base,
    });

    let pages_amount = catalog.per_page_price() * Decimal::from(pages.get());
    steps.push(PricingTraceStep {
        stage: "pages".to_string(),
        detail: format!("{} x {}", pages.get(), catalog.per_page_price()),
        amount: pages_amount,
    });

    let mut subtotal = base + pages_amount;
    for key in &input.selected_features {
        let option = catalog.feature(*key);
        subtotal += option.surcharge;
        steps.push(PricingTraceStep {
            stage: format!("feature.{key}"),
            detail: option.label.to_string(),
            amount: option.surcharge,
        });
    }

    let multiplier = catalog.tier(input.tier).multiplier;
    let rounded = (subtotal * multiplier)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    steps.push(PricingTraceStep {
        stage: format!("tier.{}", input.tier),
        detail: format!("x {multiplier}"),
        amount: rounded - subtotal,
    });

    let total = rounded.to_u64().unwrap_or_default();
    tracing::debug!(
        event_name = "quote.estimate.computed",
        pages = pages.get(),
        tier = %input.tier,
        features = input.selected_features.len(),
        total,
        "quote estimated"
    );

    Quote { subtotal, multiplier, total, breakdown: steps }
}
