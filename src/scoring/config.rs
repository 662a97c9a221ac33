use serde::{Deserialize, Serialize};

/// Main scoring configuration.
///
/// Defines how listing scores are calculated: hard constraints that gate a
/// listing to zero, the price band, the bedrooms scale, and the per-factor
/// weights. Every leaf is optional; the documented default applies when a
/// value is absent, so a partial (or empty) section is never an error.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   constraints:
///     min_bedrooms: 2
///     allowed_tenure: ["Freehold", "Share of freehold"]
///   price: { target: 380000, tolerance: 0.10 }
///   bedrooms: { cap: 4 }
///   weights:
///     price: 0.3
///     bedrooms: 0.2
///     zone: 0.2
///     travel: 0.1
///     epc: 0.1
///     subjective: 0.1
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ScoringConfig {
    /// Hard constraints. A listing failing any of them scores exactly 0.
    #[serde(default)]
    pub constraints: Constraints,

    /// The price band the buyer is aiming for.
    #[serde(default)]
    pub price: PriceBand,

    /// How bedroom count maps to a sub-score.
    #[serde(default)]
    pub bedrooms: BedroomScale,

    /// Per-factor weights. An absent weight contributes 0, so a wholly
    /// missing mapping yields a total of 0, which is valid, not an error.
    #[serde(default)]
    pub weights: Weights,
}

impl ScoringConfig {
    /// A sensible starter configuration for the init wizard. Deliberately
    /// not `Default`: the serde default must keep absent sections absent.
    pub fn suggested() -> Self {
        Self {
            constraints: Constraints {
                min_bedrooms: Some(2),
                allowed_tenure: Some(vec![
                    "Freehold".to_string(),
                    "Share of freehold".to_string(),
                ]),
            },
            price: PriceBand {
                target: Some(380_000.0),
                tolerance: Some(0.10),
            },
            bedrooms: BedroomScale { cap: Some(4) },
            weights: Weights {
                price: Some(0.3),
                bedrooms: Some(0.2),
                zone: Some(0.2),
                travel: Some(0.1),
                epc: Some(0.1),
                bank: None,
                subjective: Some(0.1),
            },
        }
    }
}

/// Pass/fail preconditions applied before any sub-score is computed.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Constraints {
    /// Minimum bedroom count (default: 2). Missing bedrooms count as 0.
    #[serde(default)]
    pub min_bedrooms: Option<u32>,

    /// Acceptable tenure values, compared case-insensitively
    /// (default: Freehold, Share of freehold).
    #[serde(default)]
    pub allowed_tenure: Option<Vec<String>>,
}

impl Constraints {
    pub fn min_bedrooms(&self) -> u32 {
        self.min_bedrooms.unwrap_or(2)
    }

    /// The allowed tenure set, case-folded for membership tests.
    pub fn allowed_tenure_folded(&self) -> Vec<String> {
        match &self.allowed_tenure {
            Some(values) => values.iter().map(|t| t.trim().to_lowercase()).collect(),
            None => vec!["freehold".to_string(), "share of freehold".to_string()],
        }
    }
}

/// The inclusive price interval `[target*(1-tolerance), target*(1+tolerance)]`
/// inside which the price sub-score is maximal.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PriceBand {
    /// Target price. Without one the band cannot be evaluated and the price
    /// sub-score is 0.
    #[serde(default)]
    pub target: Option<f64>,

    /// Band half-width as a fraction of target, e.g. 0.10 = +-10%
    /// (default: 0.10).
    #[serde(default)]
    pub tolerance: Option<f64>,
}

impl PriceBand {
    pub fn tolerance(&self) -> f64 {
        self.tolerance.unwrap_or(0.10)
    }
}

/// Linear bedrooms scale: `min(bedrooms / cap, 1)`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct BedroomScale {
    /// Bedroom count at which the sub-score saturates (default: 4).
    #[serde(default)]
    pub cap: Option<u32>,
}

impl BedroomScale {
    pub fn cap(&self) -> u32 {
        self.cap.unwrap_or(4).max(1)
    }
}

/// Per-factor weights. Weights need not sum to 1; the display score is the
/// weighted sum times a fixed 10, not a normalization by weight sum.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Weights {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<f64>,
    #[serde(default)]
    pub zone: Option<f64>,
    #[serde(default)]
    pub travel: Option<f64>,
    #[serde(default)]
    pub epc: Option<f64>,
    /// Distance-to-reference factor; only present in configs that use the
    /// locate enrichment. Absent behaves exactly like the older configs.
    #[serde(default)]
    pub bank: Option<f64>,
    #[serde(default)]
    pub subjective: Option<f64>,
}
