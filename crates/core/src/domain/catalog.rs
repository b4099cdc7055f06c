use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

pub const BASE_PRICE: u32 = 350;
pub const PER_PAGE_PRICE: u32 = 50;
pub const MIN_PAGES: u8 = 1;
pub const MAX_PAGES: u8 = 20;

/// Add-ons a visitor can put on top of the base site.
///
/// Declaration order is catalog order; summaries list features in it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    Seo,
    Cms,
    Copywriting,
    Legal,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 4] =
        [FeatureKey::Seo, FeatureKey::Cms, FeatureKey::Copywriting, FeatureKey::Legal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seo => "seo",
            Self::Cms => "cms",
            Self::Copywriting => "copywriting",
            Self::Legal => "legal",
        }
    }

    /// Lenient parse for UI state. Unknown keys are not an error.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "seo" => Some(Self::Seo),
            "cms" => Some(Self::Cms),
            "copywriting" => Some(Self::Copywriting),
            "legal" => Some(Self::Legal),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum TierId {
    #[default]
    #[serde(rename = "standard")]
    Standard,
    #[serde(rename = "premium")]
    Premium,
    #[serde(rename = "high-end", alias = "highEnd", alias = "high_end")]
    HighEnd,
}

impl TierId {
    pub const ALL: [TierId; 3] = [TierId::Standard, TierId::Premium, TierId::HighEnd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Premium => "premium",
            Self::HighEnd => "high-end",
        }
    }

    /// Tier selection coming from untyped UI state.
    ///
    /// An unknown id is a programming error: debug builds panic, release
    /// builds fall back to [`TierId::Standard`].
    pub fn from_ui(raw: &str) -> Self {
        match raw.parse::<Self>() {
            Ok(tier) => tier,
            Err(error) => {
                debug_assert!(false, "{error}");
                tracing::warn!(
                    event_name = "quote.tier.fallback",
                    raw_tier = raw,
                    "unknown tier id, falling back to standard"
                );
                Self::Standard
            }
        }
    }
}

impl FromStr for TierId {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "premium" => Ok(Self::Premium),
            "high-end" | "highend" | "high_end" => Ok(Self::HighEnd),
            _ => Err(DomainError::UnknownTier(value.to_string())),
        }
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FeatureOption {
    pub key: FeatureKey,
    pub surcharge: Decimal,
    pub label: &'static str,
    pub summary_label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DesignTier {
    pub id: TierId,
    pub multiplier: Decimal,
    pub label: &'static str,
    pub summary_label: &'static str,
    pub description: &'static str,
}

/// Price list. Constructed once, never mutated.
///
/// Holds exactly one entry per [`FeatureKey`] and [`TierId`], stored in
/// declaration order, so lookups cannot miss.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    base_price: Decimal,
    per_page_price: Decimal,
    features: [FeatureOption; 4],
    tiers: [DesignTier; 3],
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            base_price: Decimal::from(BASE_PRICE),
            per_page_price: Decimal::from(PER_PAGE_PRICE),
            features: [
                FeatureOption {
                    key: FeatureKey::Seo,
                    surcharge: Decimal::from(120),
                    label: "SEO Basis-Setup",
                    summary_label: "SEO Setup",
                },
                FeatureOption {
                    key: FeatureKey::Cms,
                    surcharge: Decimal::from(200),
                    label: "CMS (Selbst bearbeitbar)",
                    summary_label: "CMS (Selbstpflege)",
                },
                FeatureOption {
                    key: FeatureKey::Copywriting,
                    surcharge: Decimal::from(150),
                    label: "Professionelle Texte",
                    summary_label: "Texterstellung",
                },
                FeatureOption {
                    key: FeatureKey::Legal,
                    surcharge: Decimal::from(40),
                    label: "Rechtstexte (Datenschutz)",
                    summary_label: "Rechtstexte",
                },
            ],
            tiers: [
                DesignTier {
                    id: TierId::Standard,
                    multiplier: Decimal::ONE,
                    label: "Clean & Preiswert",
                    summary_label: "Clean & Basic",
                    description: "Funktional, basierend auf Best Practices. Perfekt für den Start.",
                },
                DesignTier {
                    id: TierId::Premium,
                    multiplier: Decimal::new(13, 1),
                    label: "Custom Brand",
                    summary_label: "Custom Brand",
                    description: "Individuelle Icons, Animationen, starke Identität.",
                },
                DesignTier {
                    id: TierId::HighEnd,
                    multiplier: Decimal::new(18, 1),
                    label: "High-End",
                    summary_label: "High-End",
                    description: "Awwwards-Level, 3D, WebGL, kompromisslos.",
                },
            ],
        }
    }
}

impl Catalog {
    /// Builds a price list for a different revision or studio.
    ///
    /// Entries must follow declaration order; prices and surcharges must be
    /// non-negative and multipliers at least 1 and strictly increasing.
    pub fn new(
        base_price: Decimal,
        per_page_price: Decimal,
        features: [FeatureOption; 4],
        tiers: [DesignTier; 3],
    ) -> Result<Self, DomainError> {
        let catalog = Self { base_price, per_page_price, features, tiers };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.base_price.is_sign_negative() || self.per_page_price.is_sign_negative() {
            return Err(DomainError::InvalidCatalog("prices must not be negative".to_string()));
        }

        for (option, key) in self.features.iter().zip(FeatureKey::ALL) {
            if option.key != key {
                return Err(DomainError::InvalidCatalog(format!(
                    "feature slot for `{key}` holds `{}`",
                    option.key
                )));
            }
            if option.surcharge.is_sign_negative() {
                return Err(DomainError::InvalidCatalog(format!(
                    "surcharge for `{key}` must not be negative"
                )));
            }
        }

        for (tier, id) in self.tiers.iter().zip(TierId::ALL) {
            if tier.id != id {
                return Err(DomainError::InvalidCatalog(format!(
                    "tier slot for `{id}` holds `{}`",
                    tier.id
                )));
            }
            if tier.multiplier < Decimal::ONE {
                return Err(DomainError::InvalidCatalog(format!(
                    "multiplier for `{id}` must be at least 1"
                )));
            }
        }
        if self.tiers.windows(2).any(|pair| pair[0].multiplier >= pair[1].multiplier) {
            return Err(DomainError::InvalidCatalog(
                "tier multipliers must be strictly increasing".to_string(),
            ));
        }

        Ok(())
    }

    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    pub fn per_page_price(&self) -> Decimal {
        self.per_page_price
    }

    pub fn features(&self) -> &[FeatureOption] {
        &self.features
    }

    pub fn tiers(&self) -> &[DesignTier] {
        &self.tiers
    }

    pub fn feature(&self, key: FeatureKey) -> &FeatureOption {
        &self.features[key as usize]
    }

    pub fn tier(&self, id: TierId) -> &DesignTier {
        &self.tiers[id as usize]
    }
}
