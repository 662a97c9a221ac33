use super::config::ScoringConfig;
use crate::listings::types::Listing;

/// One normalized factor and its contribution to the weighted sum.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorScore {
    pub label: &'static str, // e.g. "Price", "Zone", "Subjective"
    pub value: f64,          // normalized sub-score in [0, 1]
    pub weight: f64,         // configured weight (0 when unconfigured)
    pub weighted: f64,       // value * weight
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    /// True when a hard constraint failed; factors is empty in that case.
    pub gated: bool,
    pub factors: Vec<FactorScore>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Display score on the 0-10 scale, rounded to one decimal place.
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// A listing with its computed score attached, ready for sorting and display.
#[derive(Debug, Clone)]
pub struct ScoredListing {
    pub listing: Listing,
    pub result: ScoreResult,
}

impl ScoredListing {
    pub fn score(&self) -> f64 {
        self.result.score
    }
}

/// Score one listing and attach the result.
pub fn score_listing(listing: Listing, config: &ScoringConfig) -> ScoredListing {
    let result = compute_score(&listing, config);
    ScoredListing { listing, result }
}

/// Compute the weighted desirability score for a listing.
///
/// Pure function of (listing, config): hard constraints gate to exactly 0,
/// otherwise seven independently-normalized sub-scores are combined via the
/// configured weights and scaled to a 0-10 display range, one decimal place.
/// Total over its input domain: malformed fields were already coerced to
/// absent at the entity boundary, and every absent field has a documented
/// default here.
pub fn compute_score(listing: &Listing, config: &ScoringConfig) -> ScoreResult {
    // Hard constraints: bedroom floor and tenure membership.
    let min_beds = config.constraints.min_bedrooms();
    let ok_beds = listing.bedrooms.unwrap_or(0) >= min_beds;

    let allowed_tenure = config.constraints.allowed_tenure_folded();
    let ok_tenure = listing
        .tenure
        .as_deref()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .map(|t| allowed_tenure.contains(&t))
        .unwrap_or(false);

    if !ok_beds || !ok_tenure {
        return ScoreResult {
            score: 0.0,
            breakdown: ScoreBreakdown {
                gated: true,
                factors: Vec::new(),
            },
        };
    }

    let w = &config.weights;
    let factors = vec![
        factor("Price", price_score(listing.price, config), w.price),
        factor("Bedrooms", bedrooms_score(listing.bedrooms, config), w.bedrooms),
        factor("Zone", zone_score(listing.zone), w.zone),
        factor("Travel", travel_score(listing.travel_time_to_zone1), w.travel),
        factor("EPC", epc_score(listing.epc.as_deref()), w.epc),
        factor("Bank", bank_score(listing.distance_to_bank_km), w.bank),
        factor("Subjective", subjective_score(listing), w.subjective),
    ];

    let total: f64 = factors.iter().map(|f| f.weighted).sum();

    ScoreResult {
        score: round1(total * 10.0),
        breakdown: ScoreBreakdown {
            gated: false,
            factors,
        },
    }
}

fn factor(label: &'static str, value: f64, weight: Option<f64>) -> FactorScore {
    let weight = weight.unwrap_or(0.0);
    FactorScore {
        label,
        value,
        weight,
        weighted: weight * value,
    }
}

/// 1 inside the inclusive band, then a linear decay of 2x the fractional
/// overshoot relative to the nearer band edge (hits 0 at 50% overshoot).
fn price_score(price: Option<f64>, config: &ScoringConfig) -> f64 {
    let (price, target) = match (price, config.price.target) {
        (Some(p), Some(t)) if p > 0.0 && t > 0.0 => (p, t),
        _ => return 0.0,
    };

    let tolerance = config.price.tolerance();
    let lower = target * (1.0 - tolerance);
    let upper = target * (1.0 + tolerance);

    if price >= lower && price <= upper {
        return 1.0;
    }
    if lower <= 0.0 {
        // Degenerate band (tolerance >= 1); anything above it already matched.
        return 0.0;
    }

    let overshoot = if price < lower {
        (lower - price) / lower
    } else {
        (price - upper) / upper
    };
    (1.0 - 2.0 * overshoot).max(0.0)
}

fn bedrooms_score(bedrooms: Option<u32>, config: &ScoringConfig) -> f64 {
    let cap = config.bedrooms.cap() as f64;
    (bedrooms.unwrap_or(0) as f64 / cap).min(1.0)
}

/// Step function over fare zones; missing zone is treated as far out.
fn zone_score(zone: Option<u32>) -> f64 {
    match zone.unwrap_or(9) {
        0..=2 => 1.0,
        3 => 0.7,
        4 => 0.5,
        _ => 0.3,
    }
}

/// Minutes to zone 1, clamped to [15, 60] and mapped 15 -> 1.0, 60 -> 0.0.
fn travel_score(minutes: Option<f64>) -> f64 {
    let clamped = minutes.unwrap_or(60.0).clamp(15.0, 60.0);
    1.0 - (clamped - 15.0) / 45.0
}

/// Table lookup on the upper-cased rating; unknown ratings are neutral, not
/// zero.
fn epc_score(epc: Option<&str>) -> f64 {
    match epc.map(|e| e.trim().to_uppercase()).as_deref() {
        Some("A") => 1.0,
        Some("B") => 0.9,
        Some("C") => 0.8,
        Some("D") => 0.7,
        Some("E") => 0.55,
        Some("F") => 0.4,
        Some("G") => 0.2,
        _ => 0.5,
    }
}

/// Linear falloff reaching 0 at 12 km; neutral when the enrichment is absent.
fn bank_score(distance_km: Option<f64>) -> f64 {
    match distance_km {
        Some(d) => (1.0 - d / 12.0).max(0.0),
        None => 0.5,
    }
}

/// Mean of the seven subjective ratings, each scaled to [0, 1]. A missing
/// rating contributes 0 to the sum; the denominator stays at 7.
fn subjective_score(listing: &Listing) -> f64 {
    let ratings = listing.subjective_ratings();
    let sum: f64 = ratings.iter().map(|r| norm10(*r)).sum();
    sum / ratings.len() as f64
}

fn norm10(value: Option<f64>) -> f64 {
    match value {
        Some(v) => (v / 10.0).clamp(0.0, 1.0),
        None => 0.0,
    }
}

/// Round to one decimal place, half away from zero.
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::{BedroomScale, Constraints, PriceBand, Weights};

    fn base_config() -> ScoringConfig {
        ScoringConfig {
            constraints: Constraints {
                min_bedrooms: Some(2),
                allowed_tenure: Some(vec!["Freehold".to_string()]),
            },
            price: PriceBand {
                target: Some(380_000.0),
                tolerance: Some(0.1),
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

    fn sample_listing() -> Listing {
        Listing {
            bedrooms: Some(2),
            tenure: Some("Freehold".to_string()),
            price: Some(380_000.0),
            zone: Some(2),
            travel_time_to_zone1: Some(15.0),
            epc: Some("B".to_string()),
            ..Default::default()
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_reference_scenario_scores_7_9() {
        // price=1, bedrooms=0.5, zone=1, travel=1, epc=0.9, subjective=0
        // total = 0.3 + 0.1 + 0.2 + 0.1 + 0.09 + 0 = 0.79 -> 7.9
        let result = compute_score(&sample_listing(), &base_config());
        assert_close(result.score, 7.9);
        assert!(!result.breakdown.gated);
    }

    #[test]
    fn test_too_few_bedrooms_gates_to_zero() {
        let mut listing = sample_listing();
        listing.bedrooms = Some(1);
        let result = compute_score(&listing, &base_config());
        assert_eq!(result.score, 0.0);
        assert!(result.breakdown.gated);
        assert!(result.breakdown.factors.is_empty());
    }

    #[test]
    fn test_missing_bedrooms_counts_as_zero_and_gates() {
        let mut listing = sample_listing();
        listing.bedrooms = None;
        let result = compute_score(&listing, &base_config());
        assert_eq!(result.score, 0.0);
        assert!(result.breakdown.gated);
    }

    #[test]
    fn test_disallowed_tenure_gates_to_zero() {
        let mut listing = sample_listing();
        listing.tenure = Some("Leasehold".to_string());
        assert_eq!(compute_score(&listing, &base_config()).score, 0.0);

        listing.tenure = Some("".to_string());
        assert_eq!(compute_score(&listing, &base_config()).score, 0.0);

        listing.tenure = None;
        assert_eq!(compute_score(&listing, &base_config()).score, 0.0);
    }

    #[test]
    fn test_tenure_match_is_case_insensitive() {
        let mut listing = sample_listing();
        listing.tenure = Some("FREEHOLD".to_string());
        let result = compute_score(&listing, &base_config());
        assert!(!result.breakdown.gated);
    }

    #[test]
    fn test_price_at_target_scores_one_for_any_tolerance() {
        for tolerance in [0.0, 0.05, 0.1, 0.5] {
            let mut config = base_config();
            config.price.tolerance = Some(tolerance);
            assert_close(price_score(Some(380_000.0), &config), 1.0);
        }
    }

    #[test]
    fn test_price_band_edges_are_inclusive() {
        let config = base_config();
        // target 380000, tolerance 0.1 -> band [342000, 418000]
        assert_close(price_score(Some(342_000.0), &config), 1.0);
        assert_close(price_score(Some(418_000.0), &config), 1.0);
    }

    #[test]
    fn test_price_overshoot_decays_at_twice_rate() {
        let config = base_config();
        // 456000 is ~9.09% past the 418000 upper edge -> 1 - 2*0.0909 = 0.818
        let score = price_score(Some(456_000.0), &config);
        assert!((score - 0.818).abs() < 1e-3, "got {score}");
    }

    #[test]
    fn test_price_undershoot_decays_relative_to_lower_edge() {
        let config = base_config();
        // lower = 342000; price 307800 is 10% below -> 1 - 0.2 = 0.8
        let score = price_score(Some(307_800.0), &config);
        assert!((score - 0.8).abs() < 1e-6, "got {score}");
    }

    #[test]
    fn test_price_score_floors_at_zero() {
        let config = base_config();
        // 50% past the upper edge -> exactly 0; beyond that stays 0.
        assert_close(price_score(Some(418_000.0 * 1.5), &config), 0.0);
        assert_close(price_score(Some(1_000_000.0), &config), 0.0);
    }

    #[test]
    fn test_missing_price_or_target_scores_zero() {
        let config = base_config();
        assert_close(price_score(None, &config), 0.0);

        let mut no_target = base_config();
        no_target.price.target = None;
        assert_close(price_score(Some(380_000.0), &no_target), 0.0);
    }

    #[test]
    fn test_bedrooms_score_linear_to_cap() {
        let config = base_config();
        assert_close(bedrooms_score(Some(2), &config), 0.5);
        assert_close(bedrooms_score(Some(4), &config), 1.0);
        assert_close(bedrooms_score(Some(6), &config), 1.0);
        assert_close(bedrooms_score(None, &config), 0.0);
    }

    #[test]
    fn test_zone_score_steps() {
        assert_close(zone_score(Some(1)), 1.0);
        assert_close(zone_score(Some(2)), 1.0);
        assert_close(zone_score(Some(3)), 0.7);
        assert_close(zone_score(Some(4)), 0.5);
        assert_close(zone_score(Some(5)), 0.3);
        // Missing zone defaults far out.
        assert_close(zone_score(None), 0.3);
    }

    #[test]
    fn test_travel_score_clamps_and_maps() {
        assert_close(travel_score(Some(15.0)), 1.0);
        assert_close(travel_score(Some(10.0)), 1.0); // clamped up to 15
        assert_close(travel_score(Some(60.0)), 0.0);
        assert_close(travel_score(Some(90.0)), 0.0); // clamped down to 60
        assert_close(travel_score(Some(37.5)), 0.5);
        assert_close(travel_score(None), 0.0);
    }

    #[test]
    fn test_epc_table_and_neutral_default() {
        assert_close(epc_score(Some("A")), 1.0);
        assert_close(epc_score(Some("b")), 0.9);
        assert_close(epc_score(Some("G")), 0.2);
        assert_close(epc_score(Some("Z")), 0.5);
        assert_close(epc_score(None), 0.5);
    }

    #[test]
    fn test_bank_score_falloff_and_neutral_default() {
        assert_close(bank_score(Some(0.0)), 1.0);
        assert_close(bank_score(Some(6.0)), 0.5);
        assert_close(bank_score(Some(12.0)), 0.0);
        assert_close(bank_score(Some(20.0)), 0.0);
        assert_close(bank_score(None), 0.5);
    }

    #[test]
    fn test_subjective_divides_by_full_field_list() {
        // Two ratings present, five absent: denominator stays 7.
        let listing = Listing {
            layout: Some(10.0),
            light: Some(10.0),
            ..Default::default()
        };
        assert_close(subjective_score(&listing), 2.0 / 7.0);
    }

    #[test]
    fn test_subjective_all_absent_is_zero() {
        assert_close(subjective_score(&Listing::default()), 0.0);
    }

    #[test]
    fn test_subjective_ratings_clamp_to_scale() {
        let listing = Listing {
            layout: Some(15.0),  // clamps to 1
            light: Some(-3.0),   // clamps to 0
            ..Default::default()
        };
        assert_close(subjective_score(&listing), 1.0 / 7.0);
    }

    #[test]
    fn test_missing_weights_section_totals_zero() {
        let mut config = base_config();
        config.weights = Weights::default();
        let result = compute_score(&sample_listing(), &config);
        assert_eq!(result.score, 0.0);
        assert!(!result.breakdown.gated);
    }

    #[test]
    fn test_bank_weight_defaults_to_zero_for_old_configs() {
        // An enriched listing must score identically under a config that
        // predates the bank factor.
        let mut listing = sample_listing();
        listing.distance_to_bank_km = Some(2.0);
        let result = compute_score(&listing, &base_config());
        assert_close(result.score, 7.9);
    }

    #[test]
    fn test_bank_weight_applies_when_configured() {
        let mut config = base_config();
        config.weights.bank = Some(0.1);
        let mut listing = sample_listing();
        listing.distance_to_bank_km = Some(6.0); // bank sub-score 0.5
        let result = compute_score(&listing, &config);
        assert_close(result.score, 8.4); // 0.79 + 0.05 -> 8.4
    }

    #[test]
    fn test_score_is_bounded_for_unit_weight_profile() {
        let config = base_config(); // weights sum to 1.0
        let extremes = [
            Listing::default(),
            sample_listing(),
            Listing {
                bedrooms: Some(10),
                tenure: Some("Freehold".to_string()),
                price: Some(380_000.0),
                zone: Some(1),
                travel_time_to_zone1: Some(1.0),
                epc: Some("A".to_string()),
                distance_to_bank_km: Some(0.0),
                layout: Some(10.0),
                light: Some(10.0),
                noise: Some(10.0),
                outdoor: Some(10.0),
                kitchen: Some(10.0),
                bathroom: Some(10.0),
                area_vibe: Some(10.0),
                ..Default::default()
            },
        ];
        for listing in extremes {
            let score = compute_score(&listing, &config).score;
            assert!((0.0..=10.0).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn test_compute_score_is_pure() {
        let listing = sample_listing();
        let config = base_config();
        let before = listing.clone();

        let first = compute_score(&listing, &config);
        let second = compute_score(&listing, &config);

        assert_eq!(first, second);
        assert_eq!(listing, before);
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_close(round1(0.25), 0.3);
        assert_close(round1(-0.25), -0.3);
        assert_close(round1(7.84), 7.8);
    }

    #[test]
    fn test_breakdown_factors_sum_to_total() {
        let result = compute_score(&sample_listing(), &base_config());
        let total: f64 = result.breakdown.factors.iter().map(|f| f.weighted).sum();
        assert_close(round1(total * 10.0), result.score);
        assert_eq!(result.breakdown.factors.len(), 7);
    }
}
