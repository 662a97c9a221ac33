use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Path to the listing catalog (JSON array). Defaults to
    /// `listings.json` next to the config file.
    #[serde(default)]
    pub listings: Option<PathBuf>,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    /// Reference point for the locate command's distance report.
    #[serde(default)]
    pub reference: Option<ReferencePoint>,
}

impl Config {
    pub fn listings_path(&self) -> PathBuf {
        self.listings
            .clone()
            .unwrap_or_else(|| super::get_config_dir().join("listings.json"))
    }

    pub fn reference_point(&self) -> ReferencePoint {
        self.reference.clone().unwrap_or_default()
    }
}

/// A named coordinate distances are measured against.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReferencePoint {
    #[serde(default)]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl ReferencePoint {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("reference point")
    }
}

impl Default for ReferencePoint {
    /// Bank station, the traditional center for London commute distances.
    fn default() -> Self {
        Self {
            name: Some("Bank".to_string()),
            lat: 51.5133,
            lon: -0.0898,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parses() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert!(config.scoring.is_none());
        assert_eq!(config.reference_point().label(), "Bank");
    }

    #[test]
    fn test_full_config_parses() {
        let yaml = r#"
listings: ./data/listings.json
scoring:
  price: { target: 380000, tolerance: 0.1 }
  weights: { price: 0.5, subjective: 0.5 }
reference:
  name: King's Cross
  lat: 51.5309
  lon: -0.1233
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(
            config.listings_path(),
            PathBuf::from("./data/listings.json")
        );
        let scoring = config.scoring.unwrap();
        assert_eq!(scoring.price.target, Some(380_000.0));
        assert_eq!(config.reference.unwrap().label(), "King's Cross");
    }
}
