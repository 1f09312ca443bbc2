//! Factor curves
//!
//! Each curve maps one measurement onto a signed contribution in `[-1, 1]`.
//! The calculator multiplies them by per-factor weights. Curves defined by
//! control points interpolate linearly and hold their end values outside the
//! table, so every segment is monotonic.

use crate::models::{FishCategory, MoonPhase, PressureTrend};

/// Hour-of-day activity: dawn (5-9h) and dusk (17-21h) peaks, floors at
/// noon and midnight.
const HOUR_CURVE: [(f64, f64); 13] = [
    (0.0, -0.6),
    (3.0, -0.3),
    (5.0, 0.6),
    (6.0, 1.0),
    (8.0, 1.0),
    (9.0, 0.6),
    (12.0, -0.6),
    (15.0, -0.2),
    (17.0, 0.6),
    (18.0, 1.0),
    (20.0, 1.0),
    (21.0, 0.6),
    (24.0, -0.6),
];

/// Wind in km/h: flat calm and strong wind are both unfavorable
const WIND_CURVE: [(f64, f64); 7] = [
    (0.0, -0.3),
    (3.0, 0.2),
    (5.0, 1.0),
    (15.0, 1.0),
    (25.0, 0.3),
    (40.0, -0.6),
    (55.0, -1.0),
];

/// Cloud cover in percent
const CLOUD_CURVE: [(f64, f64); 5] = [
    (0.0, -0.4),
    (20.0, 0.0),
    (50.0, 1.0),
    (85.0, 1.0),
    (100.0, 0.6),
];

/// Degrees outside the optimal band at which the water temperature curve bottoms out
const TEMPERATURE_FALLOFF_CELSIUS: f64 = 8.0;

/// Linear interpolation over `(x, y)` control points sorted by `x`
pub fn piecewise_linear(points: &[(f64, f64)], x: f64) -> f64 {
    let Some(&(first_x, first_y)) = points.first() else {
        return 0.0;
    };
    if x <= first_x {
        return first_y;
    }
    for window in points.windows(2) {
        let (x0, y0) = window[0];
        let (x1, y1) = window[1];
        if x <= x1 {
            if x1 == x0 {
                return y1;
            }
            return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
        }
    }
    points.last().map(|&(_, y)| y).unwrap_or(first_y)
}

/// Falling pressure ahead of a front triggers feeding; rising pressure slows it.
///
/// Only the trend category matters, not the raw pressure value.
pub fn pressure_contribution(trend: PressureTrend) -> f64 {
    match trend {
        PressureTrend::Falling => 1.0,
        PressureTrend::Stable => 0.0,
        PressureTrend::Rising => -0.7,
    }
}

/// Local hour in `[0, 24)`; fractional hours are allowed
pub fn hour_of_day_contribution(hour: f64) -> f64 {
    piecewise_linear(&HOUR_CURVE, hour)
}

pub fn wind_contribution(speed_kmh: f64) -> f64 {
    piecewise_linear(&WIND_CURVE, speed_kmh)
}

/// New and full moon are the strong solunar periods, quarters are neutral
pub fn moon_phase_contribution(phase: MoonPhase) -> f64 {
    match phase {
        MoonPhase::New | MoonPhase::Full => 1.0,
        MoonPhase::WaxingCrescent
        | MoonPhase::WaxingGibbous
        | MoonPhase::WaningGibbous
        | MoonPhase::WaningCrescent => 0.4,
        MoonPhase::FirstQuarter | MoonPhase::LastQuarter => 0.0,
    }
}

/// Full marks inside the category's optimal band, dropping linearly to -1
/// once the temperature is [`TEMPERATURE_FALLOFF_CELSIUS`] outside of it.
pub fn water_temperature_contribution(celsius: f64, category: FishCategory) -> f64 {
    let (low, high) = category.optimal_water_temperature();
    let distance = if celsius < low {
        low - celsius
    } else if celsius > high {
        celsius - high
    } else {
        0.0
    };
    (1.0 - 2.0 * distance / TEMPERATURE_FALLOFF_CELSIUS).max(-1.0)
}

/// Overcast skies reduce light penetration and bring fish up
pub fn cloud_cover_contribution(percent: f64) -> f64 {
    piecewise_linear(&CLOUD_CURVE, percent)
}

/// Spring and autumn are the active seasons, winter the slowest
pub fn season_contribution(month: u32) -> f64 {
    match month {
        1 => -1.0,
        2 => -0.8,
        3 => -0.2,
        4 => 0.6,
        5 => 1.0,
        6 => 0.8,
        7 => 0.2,
        8 => 0.1,
        9 => 0.8,
        10 => 0.7,
        11 => -0.2,
        12 => -0.8,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_piecewise_linear_interpolates() {
        let points = [(0.0, 0.0), (10.0, 1.0)];
        assert!((piecewise_linear(&points, 5.0) - 0.5).abs() < 1e-9);
        assert_eq!(piecewise_linear(&points, -3.0), 0.0);
        assert_eq!(piecewise_linear(&points, 30.0), 1.0);
        assert_eq!(piecewise_linear(&[], 3.0), 0.0);
    }

    #[test]
    fn test_pressure_ordering() {
        assert!(pressure_contribution(PressureTrend::Falling) > pressure_contribution(PressureTrend::Stable));
        assert!(pressure_contribution(PressureTrend::Stable) > pressure_contribution(PressureTrend::Rising));
        assert_eq!(pressure_contribution(PressureTrend::Stable), 0.0);
    }

    #[test]
    fn test_hour_peaks_beat_noon_and_midnight() {
        let noon = hour_of_day_contribution(12.0);
        assert!(hour_of_day_contribution(7.0) > noon);
        assert!(hour_of_day_contribution(19.0) > noon);
        assert!(hour_of_day_contribution(7.0) > hour_of_day_contribution(0.0));
    }

    #[test]
    fn test_hour_monotonic_between_dawn_and_noon() {
        let mut previous = hour_of_day_contribution(8.0);
        for tenth in 81..=120 {
            let value = hour_of_day_contribution(tenth as f64 / 10.0);
            assert!(value <= previous);
            previous = value;
        }
    }

    #[test]
    fn test_wind_light_beats_strong() {
        assert!(wind_contribution(10.0) > wind_contribution(50.0));
        assert!(wind_contribution(10.0) > wind_contribution(0.0));
    }

    #[test]
    fn test_moon_full_beats_quarter() {
        assert!(moon_phase_contribution(MoonPhase::Full) > moon_phase_contribution(MoonPhase::FirstQuarter));
        assert_eq!(moon_phase_contribution(MoonPhase::New), moon_phase_contribution(MoonPhase::Full));
    }

    #[test]
    fn test_water_temperature_generic_band() {
        let optimal = water_temperature_contribution(16.0, FishCategory::Generic);
        let cold = water_temperature_contribution(3.0, FishCategory::Generic);
        let hot = water_temperature_contribution(29.0, FishCategory::Generic);
        assert_eq!(optimal, 1.0);
        assert!(optimal > cold);
        assert!(optimal > hot);
        assert_eq!(cold, -1.0);
    }

    #[test]
    fn test_water_temperature_depends_on_category() {
        // 10°C suits trout better than carp
        assert!(
            water_temperature_contribution(10.0, FishCategory::Salmonids)
                > water_temperature_contribution(10.0, FishCategory::Cyprinids)
        );
    }

    #[test]
    fn test_cloud_cover_overcast_beats_clear() {
        assert!(cloud_cover_contribution(70.0) > cloud_cover_contribution(0.0));
        assert!(cloud_cover_contribution(0.0) < 0.0);
    }

    #[test]
    fn test_season_spring_beats_winter() {
        assert!(season_contribution(5) > season_contribution(1));
        assert_eq!(season_contribution(13), 0.0);
    }

    proptest! {
        #[test]
        fn prop_curves_stay_in_unit_range(
            hour in 0.0f64..24.0,
            wind in 0.0f64..150.0,
            cloud in 0.0f64..=100.0,
            water in -5.0f64..40.0,
            month in 1u32..=12,
        ) {
            for value in [
                hour_of_day_contribution(hour),
                wind_contribution(wind),
                cloud_cover_contribution(cloud),
                water_temperature_contribution(water, FishCategory::Generic),
                season_contribution(month),
            ] {
                prop_assert!((-1.0..=1.0).contains(&value));
            }
        }
    }
}
