use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::catalog::{FeatureKey, TierId, MAX_PAGES, MIN_PAGES};

/// Number of pages being quoted, always within `MIN_PAGES..=MAX_PAGES`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct PageCount(u8);

impl PageCount {
    pub const MIN: PageCount = PageCount(MIN_PAGES);
    pub const MAX: PageCount = PageCount(MAX_PAGES);

    /// Out-of-range values are clamped, never stored.
    pub fn clamped(raw: i64) -> Self {
        let clamped = raw.clamp(i64::from(MIN_PAGES), i64::from(MAX_PAGES));
        // clamped fits in u8 by construction
        Self(clamped as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for PageCount {
    fn default() -> Self {
        Self::MIN
    }
}

impl From<i64> for PageCount {
    fn from(raw: i64) -> Self {
        Self::clamped(raw)
    }
}

impl From<PageCount> for u8 {
    fn from(value: PageCount) -> Self {
        value.0
    }
}

/// Calculator state owned by a single estimator view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteInput {
    pub page_count: PageCount,
    pub tier: TierId,
    #[serde(default, deserialize_with = "known_feature_keys")]
    pub selected_features: BTreeSet<FeatureKey>,
}

/// Unknown keys come from newer UI state and are dropped, not rejected.
fn known_feature_keys<'de, D>(deserializer: D) -> Result<BTreeSet<FeatureKey>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(raw.iter().filter_map(|key| FeatureKey::parse(key)).collect())
}

impl QuoteInput {
    pub fn new(page_count: i64, tier: TierId) -> Self {
        Self {
            page_count: PageCount::clamped(page_count),
            tier,
            selected_features: BTreeSet::new(),
        }
    }

    pub fn with_features(mut self, features: impl IntoIterator<Item = FeatureKey>) -> Self {
        self.selected_features.extend(features);
        self
    }

    pub fn set_page_count(&mut self, raw: i64) {
        self.page_count = PageCount::clamped(raw);
    }

    pub fn set_tier(&mut self, tier: TierId) {
        self.tier = tier;
    }

    pub fn select_feature(&mut self, key: FeatureKey) {
        self.selected_features.insert(key);
    }

    pub fn deselect_feature(&mut self, key: FeatureKey) {
        self.selected_features.remove(&key);
    }

    /// Returns whether the feature is selected afterwards.
    pub fn toggle_feature(&mut self, key: FeatureKey) -> bool {
        if self.selected_features.remove(&key) {
            false
        } else {
            self.selected_features.insert(key);
            true
        }
    }

    pub fn is_selected(&self, key: FeatureKey) -> bool {
        self.selected_features.contains(&key)
    }

    /// Selects features by their UI key. Keys outside the catalog are
    /// skipped; returns how many keys were recognised.
    pub fn select_feature_keys<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) -> usize {
        let mut recognised = 0;
        for raw in keys {
            match FeatureKey::parse(raw) {
                Some(key) => {
                    self.selected_features.insert(key);
                    recognised += 1;
                }
                None => {
                    tracing::debug!(
                        event_name = "quote.feature.ignored",
                        feature_key = raw,
                        "ignoring unknown feature key"
                    );
                }
            }
        }
        recognised
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

/// Derived result of pricing a [`QuoteInput`]. Recomputed, never edited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub subtotal: Decimal,
    pub multiplier: Decimal,
    pub total: u64,
    pub breakdown: Vec<PricingTraceStep>,
}
