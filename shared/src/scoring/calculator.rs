//! Fish activity index calculator
//!
//! Weighted factor curves are summed onto a neutral baseline of 50 and the
//! total is clamped to 0-100. The calculator is a pure function: the same
//! input always yields the same score and the same factor list, in a fixed
//! canonical order (pressure, time of day, wind, moon, temperature, cloud
//! cover, season).

use crate::models::{
    ActivityFactor, ActivityInput, ActivityLevel, FactorImpact, FishActivityResult, FishCategory,
    MoonPhase, PressureTrend,
};
use crate::scoring::curves;
use crate::validation::{validate_finite, validate_hour_of_day, validate_month, ValidationError};

/// Score of a perfectly neutral set of conditions
pub const BASELINE_SCORE: f64 = 50.0;

const PRESSURE_WEIGHT: f64 = 15.0;
const HOUR_WEIGHT: f64 = 15.0;
const WIND_WEIGHT: f64 = 10.0;
const MOON_WEIGHT: f64 = 10.0;
const WATER_TEMPERATURE_WEIGHT: f64 = 15.0;
/// Air temperature is a weak proxy, used only when water temperature is unknown
const AIR_TEMPERATURE_WEIGHT: f64 = WATER_TEMPERATURE_WEIGHT / 2.0;
const CLOUD_WEIGHT: f64 = 5.0;
const SEASON_WEIGHT: f64 = 8.0;

/// Compute the fish activity index for a set of conditions
pub fn calculate_fish_activity(input: &ActivityInput) -> Result<FishActivityResult, ValidationError> {
    validate_input(input)?;

    let category = input.fish_category.unwrap_or_default();
    let contributions = [
        pressure_factor(input.pressure_trend, input.pressure_hpa),
        hour_factor(input.hour_of_day),
        wind_factor(input.wind_speed_kmh),
        moon_factor(input.moon_phase),
        temperature_factor(input, category),
        cloud_factor(input.cloud_cover_percent),
        season_factor(input.month),
    ];

    let total: f64 = BASELINE_SCORE + contributions.iter().map(|(points, _)| points).sum::<f64>();
    let score = total.clamp(0.0, 100.0).round() as u8;
    let level = ActivityLevel::from_score(score);

    Ok(FishActivityResult {
        score,
        label: level.label().to_string(),
        color: level.color().to_string(),
        factors: contributions.into_iter().map(|(_, factor)| factor).collect(),
    })
}

fn validate_input(input: &ActivityInput) -> Result<(), ValidationError> {
    validate_hour_of_day(input.hour_of_day)?;
    validate_month(input.month)?;
    validate_finite("pressure_hpa", input.pressure_hpa)?;
    validate_finite("temperature_celsius", input.temperature_celsius)?;
    validate_finite("wind_speed_kmh", input.wind_speed_kmh)?;
    validate_finite("cloud_cover_percent", input.cloud_cover_percent)?;
    if let Some(water) = input.water_temperature_celsius {
        validate_finite("water_temperature_celsius", water)?;
    }
    Ok(())
}

fn factor(name: &str, points: f64, description: String) -> (f64, ActivityFactor) {
    (
        points,
        ActivityFactor::new(name, FactorImpact::from_contribution(points), description),
    )
}

fn pressure_factor(trend: PressureTrend, pressure_hpa: f64) -> (f64, ActivityFactor) {
    let points = PRESSURE_WEIGHT * curves::pressure_contribution(trend);
    let description = match trend {
        PressureTrend::Falling => {
            format!("Falling pressure ({:.0} hPa) ahead of a front triggers feeding", pressure_hpa)
        }
        PressureTrend::Stable => format!("Stable pressure ({:.0} hPa)", pressure_hpa),
        PressureTrend::Rising => {
            format!("Rising pressure ({:.0} hPa) usually slows fish down", pressure_hpa)
        }
    };
    factor("Pressure", points, description)
}

fn hour_factor(hour: u32) -> (f64, ActivityFactor) {
    let points = HOUR_WEIGHT * curves::hour_of_day_contribution(hour as f64);
    let description = match hour {
        5..=9 => "Dawn feeding window",
        17..=21 => "Dusk feeding window",
        10..=16 => "Midday lull, fish hold deeper",
        _ => "Night time, little surface activity",
    };
    factor("Time of day", points, description.to_string())
}

fn wind_factor(speed_kmh: f64) -> (f64, ActivityFactor) {
    let points = WIND_WEIGHT * curves::wind_contribution(speed_kmh);
    let description = if speed_kmh < 3.0 {
        format!("Flat calm ({:.0} km/h), fish are wary", speed_kmh)
    } else if speed_kmh <= 15.0 {
        format!("Light wind ({:.0} km/h) ripples the surface", speed_kmh)
    } else if speed_kmh <= 30.0 {
        format!("Moderate wind ({:.0} km/h)", speed_kmh)
    } else {
        format!("Strong wind ({:.0} km/h) makes fishing difficult", speed_kmh)
    };
    factor("Wind", points, description)
}

fn moon_factor(phase: MoonPhase) -> (f64, ActivityFactor) {
    let points = MOON_WEIGHT * curves::moon_phase_contribution(phase);
    let description = if phase.is_major() {
        format!("{}: strong solunar period", phase)
    } else {
        format!("{}: moderate solunar influence", phase)
    };
    factor("Moon", points, description)
}

fn temperature_factor(input: &ActivityInput, category: FishCategory) -> (f64, ActivityFactor) {
    let (low, high) = category.optimal_water_temperature();
    let (name, celsius, weight) = match input.water_temperature_celsius {
        Some(water) => ("Water temperature", water, WATER_TEMPERATURE_WEIGHT),
        None => ("Air temperature", input.temperature_celsius, AIR_TEMPERATURE_WEIGHT),
    };
    let points = weight * curves::water_temperature_contribution(celsius, category);
    let description = if celsius < low {
        format!("{:.1}°C is below the optimal {:.0}-{:.0}°C range", celsius, low, high)
    } else if celsius > high {
        format!("{:.1}°C is above the optimal {:.0}-{:.0}°C range", celsius, low, high)
    } else {
        format!("{:.1}°C is within the optimal {:.0}-{:.0}°C range", celsius, low, high)
    };
    factor(name, points, description)
}

fn cloud_factor(percent: f64) -> (f64, ActivityFactor) {
    let points = CLOUD_WEIGHT * curves::cloud_cover_contribution(percent);
    let description = if percent < 20.0 {
        "Clear sky, fish stay deeper"
    } else if percent < 50.0 {
        "Partly cloudy"
    } else {
        "Overcast sky reduces light penetration"
    };
    factor("Cloud cover", points, description.to_string())
}

fn season_factor(month: u32) -> (f64, ActivityFactor) {
    let points = SEASON_WEIGHT * curves::season_contribution(month);
    let description = match month {
        3..=5 => "Spring, fish are feeding after winter",
        6..=8 => "Summer",
        9..=11 => "Autumn, fish feed up before winter",
        _ => "Winter, metabolism is slow",
    };
    factor("Season", points, description.to_string())
}
