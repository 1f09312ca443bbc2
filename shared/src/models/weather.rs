//! Weather and astronomical models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::validation::ValidationError;

/// Pressure change (hPa) over the comparison window that counts as a trend
pub const PRESSURE_TREND_THRESHOLD_HPA: f64 = 1.0;

/// Mean length of a lunation in days
const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

/// Reference new moon: 2000-01-06 18:14 UTC
const REFERENCE_NEW_MOON_UNIX: i64 = 947_182_440;

/// Current weather conditions at a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub timestamp: DateTime<Utc>,
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub pressure_hpa: f64,
    pub wind_speed_kmh: f64,
    pub cloud_cover_percent: f64,
    /// Trend over the provider's short history window, when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_trend: Option<PressureTrend>,
}

/// Atmospheric pressure trend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PressureTrend {
    Rising,
    Stable,
    Falling,
}

impl PressureTrend {
    /// Classify the change between two pressure readings
    pub fn classify(previous_hpa: f64, current_hpa: f64) -> Self {
        let delta = current_hpa - previous_hpa;
        if delta > PRESSURE_TREND_THRESHOLD_HPA {
            PressureTrend::Rising
        } else if delta < -PRESSURE_TREND_THRESHOLD_HPA {
            PressureTrend::Falling
        } else {
            PressureTrend::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PressureTrend::Rising => "rising",
            PressureTrend::Stable => "stable",
            PressureTrend::Falling => "falling",
        }
    }
}

impl FromStr for PressureTrend {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rising" => Ok(PressureTrend::Rising),
            "stable" => Ok(PressureTrend::Stable),
            "falling" => Ok(PressureTrend::Falling),
            other => Err(ValidationError::unknown("pressure_trend", other)),
        }
    }
}

impl std::fmt::Display for PressureTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lunar phase, in the order they occur
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    const CYCLE: [MoonPhase; 8] = [
        MoonPhase::New,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::Full,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Approximate phase at an instant from the mean synodic month.
    ///
    /// Good to within about a day, which is all the activity index needs.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        let elapsed_days = (at.timestamp() - REFERENCE_NEW_MOON_UNIX) as f64 / 86_400.0;
        let age = elapsed_days.rem_euclid(SYNODIC_MONTH_DAYS);
        let index = ((age / SYNODIC_MONTH_DAYS) * 8.0 + 0.5).floor() as usize % 8;
        Self::CYCLE[index]
    }

    /// New and full moon give the strongest solunar periods
    pub fn is_major(&self) -> bool {
        matches!(self, MoonPhase::New | MoonPhase::Full)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoonPhase::New => "new",
            MoonPhase::WaxingCrescent => "waxing_crescent",
            MoonPhase::FirstQuarter => "first_quarter",
            MoonPhase::WaxingGibbous => "waxing_gibbous",
            MoonPhase::Full => "full",
            MoonPhase::WaningGibbous => "waning_gibbous",
            MoonPhase::LastQuarter => "last_quarter",
            MoonPhase::WaningCrescent => "waning_crescent",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MoonPhase::New => "New moon",
            MoonPhase::WaxingCrescent => "Waxing crescent",
            MoonPhase::FirstQuarter => "First quarter",
            MoonPhase::WaxingGibbous => "Waxing gibbous",
            MoonPhase::Full => "Full moon",
            MoonPhase::WaningGibbous => "Waning gibbous",
            MoonPhase::LastQuarter => "Last quarter",
            MoonPhase::WaningCrescent => "Waning crescent",
        }
    }
}

impl FromStr for MoonPhase {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CYCLE
            .iter()
            .copied()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| ValidationError::unknown("moon_phase", s))
    }
}

impl std::fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
