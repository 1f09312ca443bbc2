//! Fishability blend
//!
//! The displayed fishability score mixes the spot's static quality with the
//! dynamic activity index. Live water signals are applied to the dynamic
//! score afterwards, as a penalty or bonus rather than a weighted term, so a
//! dry riverbed or a red flood warning dominates however good the weather is.

use crate::models::{ActivityFactor, FactorImpact, FlowStatus, VigilanceLevel};

pub const STATIC_WEIGHT: f64 = 0.45;
pub const DYNAMIC_WEIGHT: f64 = 0.55;

/// Dynamic score used when no live conditions are available
pub const NEUTRAL_DYNAMIC_SCORE: u8 = 50;

/// Blend static and dynamic scores: `round(0.45 * static + 0.55 * dynamic)`.
///
/// Inputs outside 0-100 (or NaN) are clamped rather than rejected.
pub fn compute_fishability_score(static_score: f64, dynamic_score: f64) -> u8 {
    let static_score = clamp_score(static_score);
    let dynamic_score = clamp_score(dynamic_score);
    let blended = STATIC_WEIGHT * static_score + DYNAMIC_WEIGHT * dynamic_score;
    blended.round().clamp(0.0, 100.0) as u8
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Dynamic score after live water signals have been applied
#[derive(Debug, Clone, PartialEq)]
pub struct WaterAdjustment {
    pub score: u8,
    pub factors: Vec<ActivityFactor>,
}

enum Adjustment {
    Delta(i32),
    Cap(i32),
}

fn flow_adjustment(status: FlowStatus) -> (Adjustment, ActivityFactor) {
    match status {
        FlowStatus::Flowing => (
            Adjustment::Delta(5),
            ActivityFactor::new("Water flow", FactorImpact::Positive, "River is flowing normally"),
        ),
        FlowStatus::WeakFlow => (
            Adjustment::Delta(-8),
            ActivityFactor::new("Water flow", FactorImpact::Negative, "Weak flow, fish are concentrated in pools"),
        ),
        FlowStatus::Stagnant => (
            Adjustment::Delta(-25),
            ActivityFactor::new("Water flow", FactorImpact::Negative, "Stagnant water, poor oxygenation"),
        ),
        FlowStatus::Dry => (
            Adjustment::Cap(5),
            ActivityFactor::new("Water flow", FactorImpact::Negative, "Watercourse is dry"),
        ),
    }
}

fn vigilance_adjustment(level: VigilanceLevel) -> (Adjustment, ActivityFactor) {
    match level {
        VigilanceLevel::Green => (
            Adjustment::Delta(0),
            ActivityFactor::new("Flood vigilance", FactorImpact::Neutral, "No flood vigilance"),
        ),
        VigilanceLevel::Yellow => (
            Adjustment::Delta(-5),
            ActivityFactor::new("Flood vigilance", FactorImpact::Negative, "Yellow flood vigilance, rising and murky water"),
        ),
        VigilanceLevel::Orange => (
            Adjustment::Delta(-20),
            ActivityFactor::new("Flood vigilance", FactorImpact::Negative, "Orange flood vigilance, banks may be unsafe"),
        ),
        VigilanceLevel::Red => (
            Adjustment::Cap(10),
            ActivityFactor::new("Flood vigilance", FactorImpact::Negative, "Red flood vigilance, stay away from the water"),
        ),
    }
}

/// Apply live water signals on top of the activity index.
///
/// Deltas are summed first, then caps are applied, so a cap always wins.
/// A missing signal means "no data" and adds nothing.
pub fn apply_water_adjustment(
    base_score: u8,
    flow: Option<FlowStatus>,
    vigilance: Option<VigilanceLevel>,
) -> WaterAdjustment {
    let adjustments: Vec<(Adjustment, ActivityFactor)> = flow
        .map(flow_adjustment)
        .into_iter()
        .chain(vigilance.map(vigilance_adjustment))
        .collect();

    let mut score = base_score as i32;
    for (adjustment, _) in &adjustments {
        if let Adjustment::Delta(delta) = adjustment {
            score += delta;
        }
    }
    score = score.clamp(0, 100);
    for (adjustment, _) in &adjustments {
        if let Adjustment::Cap(cap) = adjustment {
            score = score.min(*cap);
        }
    }

    WaterAdjustment {
        score: score as u8,
        factors: adjustments.into_iter().map(|(_, factor)| factor).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_blend_arithmetic() {
        assert_eq!(compute_fishability_score(50.0, 50.0), 50);
        assert_eq!(compute_fishability_score(100.0, 0.0), 45);
        assert_eq!(compute_fishability_score(0.0, 100.0), 55);
        assert_eq!(compute_fishability_score(100.0, 100.0), 100);
        assert_eq!(compute_fishability_score(0.0, 0.0), 0);
    }

    #[test]
    fn test_blend_clamps_out_of_range_inputs() {
        assert_eq!(compute_fishability_score(150.0, 50.0), compute_fishability_score(100.0, 50.0));
        assert_eq!(compute_fishability_score(-20.0, 50.0), compute_fishability_score(0.0, 50.0));
        assert_eq!(compute_fishability_score(f64::NAN, 100.0), 55);
    }

    #[test]
    fn test_dry_river_dominates_good_weather() {
        let adjusted = apply_water_adjustment(100, Some(FlowStatus::Dry), None);
        assert_eq!(adjusted.score, 5);
        assert_eq!(adjusted.factors.len(), 1);
        assert_eq!(adjusted.factors[0].impact, FactorImpact::Negative);
    }

    #[test]
    fn test_flowing_is_a_small_bonus() {
        let adjusted = apply_water_adjustment(60, Some(FlowStatus::Flowing), None);
        assert_eq!(adjusted.score, 65);
        let adjusted = apply_water_adjustment(98, Some(FlowStatus::Flowing), None);
        assert_eq!(adjusted.score, 100);
    }

    #[test]
    fn test_stagnant_and_orange_accumulate() {
        let adjusted = apply_water_adjustment(70, Some(FlowStatus::Stagnant), Some(VigilanceLevel::Orange));
        assert_eq!(adjusted.score, 25);
        assert_eq!(adjusted.factors.len(), 2);
    }

    #[test]
    fn test_red_vigilance_caps_even_with_flow_bonus() {
        let adjusted = apply_water_adjustment(90, Some(FlowStatus::Flowing), Some(VigilanceLevel::Red));
        assert_eq!(adjusted.score, 10);
    }

    #[test]
    fn test_missing_signals_leave_score_unchanged() {
        let adjusted = apply_water_adjustment(63, None, None);
        assert_eq!(adjusted.score, 63);
        assert!(adjusted.factors.is_empty());
    }

    #[test]
    fn test_green_vigilance_is_neutral() {
        let adjusted = apply_water_adjustment(40, None, Some(VigilanceLevel::Green));
        assert_eq!(adjusted.score, 40);
        assert_eq!(adjusted.factors[0].impact, FactorImpact::Neutral);
    }

    proptest! {
        #[test]
        fn prop_blend_in_range(static_score in -50.0f64..150.0, dynamic_score in -50.0f64..150.0) {
            let score = compute_fishability_score(static_score, dynamic_score);
            prop_assert!(score <= 100);
        }

        #[test]
        fn prop_blend_monotonic_in_dynamic(static_score in 0.0f64..=100.0, a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(compute_fishability_score(static_score, low) <= compute_fishability_score(static_score, high));
        }

        #[test]
        fn prop_dry_never_above_cap(base in 0u8..=100) {
            let adjusted = apply_water_adjustment(base, Some(FlowStatus::Dry), Some(VigilanceLevel::Green));
            prop_assert!(adjusted.score <= 5);
        }
    }
}
