use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
///
/// Negative weights are deliberately not rejected: the score contract leaves
/// their effect to the caller. Non-finite numbers are, since they would
/// poison every downstream sum.
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(target) = config.price.target {
        if !target.is_finite() || target <= 0.0 {
            errors.push(format!(
                "scoring.price.target: must be a positive number, got {}",
                target
            ));
        }
    }

    if let Some(tolerance) = config.price.tolerance {
        if !tolerance.is_finite() || !(0.0..1.0).contains(&tolerance) {
            errors.push(format!(
                "scoring.price.tolerance: must be a fraction in [0, 1), got {}",
                tolerance
            ));
        }
    }

    if let Some(cap) = config.bedrooms.cap {
        if cap < 1 {
            errors.push("scoring.bedrooms.cap: must be at least 1".to_string());
        }
    }

    if let Some(ref tenures) = config.constraints.allowed_tenure {
        if tenures.iter().all(|t| t.trim().is_empty()) {
            errors.push(
                "scoring.constraints.allowed_tenure: set is empty, every listing would be gated out"
                    .to_string(),
            );
        }
    }

    let weights = [
        ("price", config.weights.price),
        ("bedrooms", config.weights.bedrooms),
        ("zone", config.weights.zone),
        ("travel", config.weights.travel),
        ("epc", config.weights.epc),
        ("bank", config.weights.bank),
        ("subjective", config.weights.subjective),
    ];
    for (name, weight) in weights {
        if let Some(w) = weight {
            if !w.is_finite() {
                errors.push(format!("scoring.weights.{}: must be finite, got {}", name, w));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::{PriceBand, Weights};

    #[test]
    fn test_empty_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_suggested_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::suggested()).is_ok());
    }

    #[test]
    fn test_non_positive_target_rejected() {
        let mut config = ScoringConfig::default();
        config.price = PriceBand {
            target: Some(0.0),
            tolerance: None,
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("price.target"));
    }

    #[test]
    fn test_tolerance_out_of_range_rejected() {
        let mut config = ScoringConfig::default();
        config.price.tolerance = Some(1.0);
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("price.tolerance"));

        config.price.tolerance = Some(-0.1);
        assert!(validate_scoring(&config).is_err());
    }

    #[test]
    fn test_zero_cap_rejected() {
        let mut config = ScoringConfig::default();
        config.bedrooms.cap = Some(0);
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("bedrooms.cap"));
    }

    #[test]
    fn test_empty_tenure_set_rejected() {
        let mut config = ScoringConfig::default();
        config.constraints.allowed_tenure = Some(vec!["  ".to_string()]);
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("allowed_tenure"));
    }

    #[test]
    fn test_non_finite_weight_rejected() {
        let mut config = ScoringConfig::default();
        config.weights = Weights {
            price: Some(f64::NAN),
            ..Default::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("weights.price"));
    }

    #[test]
    fn test_negative_weight_accepted() {
        let mut config = ScoringConfig::default();
        config.weights.price = Some(-0.5);
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ScoringConfig::default();
        config.price.target = Some(-1.0);
        config.price.tolerance = Some(2.0);
        config.bedrooms.cap = Some(0);
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
