//! Fish activity index models

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::weather::{MoonPhase, PressureTrend};
use crate::validation::ValidationError;

/// Broad fish family used to pick an optimal water temperature band
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FishCategory {
    /// Trout, grayling, char
    Salmonids,
    /// Pike, zander, perch, black bass
    Predators,
    /// Carp, roach, bream, tench
    Cyprinids,
    #[default]
    Generic,
}

impl FishCategory {
    /// Optimal water temperature range in °C (inclusive)
    pub fn optimal_water_temperature(&self) -> (f64, f64) {
        match self {
            FishCategory::Salmonids => (8.0, 16.0),
            FishCategory::Predators => (12.0, 20.0),
            FishCategory::Cyprinids => (16.0, 24.0),
            FishCategory::Generic => (12.0, 20.0),
        }
    }
}

impl FromStr for FishCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "salmonids" => Ok(FishCategory::Salmonids),
            "predators" => Ok(FishCategory::Predators),
            "cyprinids" => Ok(FishCategory::Cyprinids),
            "generic" => Ok(FishCategory::Generic),
            other => Err(ValidationError::unknown("fish_category", other)),
        }
    }
}

/// Everything the activity calculator looks at
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityInput {
    pub pressure_hpa: f64,
    pub pressure_trend: PressureTrend,
    pub temperature_celsius: f64,
    #[serde(default)]
    pub water_temperature_celsius: Option<f64>,
    pub wind_speed_kmh: f64,
    pub cloud_cover_percent: f64,
    pub moon_phase: MoonPhase,
    /// Local hour, 0-23
    pub hour_of_day: u32,
    /// Calendar month, 1-12
    pub month: u32,
    #[serde(default)]
    pub fish_category: Option<FishCategory>,
}

/// Direction of a factor's influence
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FactorImpact {
    Positive,
    Neutral,
    Negative,
}

impl FactorImpact {
    /// Contributions smaller than this (in score points) read as neutral
    pub const NEUTRAL_BAND: f64 = 1.0;

    pub fn from_contribution(points: f64) -> Self {
        if points > Self::NEUTRAL_BAND {
            FactorImpact::Positive
        } else if points < -Self::NEUTRAL_BAND {
            FactorImpact::Negative
        } else {
            FactorImpact::Neutral
        }
    }
}

/// One line of the score breakdown shown to the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityFactor {
    pub name: String,
    pub impact: FactorImpact,
    pub description: String,
}

impl ActivityFactor {
    pub fn new(name: &str, impact: FactorImpact, description: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            impact,
            description: description.into(),
        }
    }
}

/// Qualitative activity band, ordered from worst to best
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Below 20
    Bad,
    /// 20-39
    Poor,
    /// 40-59
    Average,
    /// 60-79
    Good,
    /// 80 and above
    Excellent,
}

impl ActivityLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ActivityLevel::Excellent,
            60..=79 => ActivityLevel::Good,
            40..=59 => ActivityLevel::Average,
            20..=39 => ActivityLevel::Poor,
            _ => ActivityLevel::Bad,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Excellent => "Excellent",
            ActivityLevel::Good => "Good",
            ActivityLevel::Average => "Average",
            ActivityLevel::Poor => "Poor",
            ActivityLevel::Bad => "Bad",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ActivityLevel::Excellent => "#16a34a",
            ActivityLevel::Good => "#65a30d",
            ActivityLevel::Average => "#eab308",
            ActivityLevel::Poor => "#f97316",
            ActivityLevel::Bad => "#dc2626",
        }
    }
}

impl std::fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of the activity calculator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FishActivityResult {
    pub score: u8,
    pub label: String,
    pub color: String,
    pub factors: Vec<ActivityFactor>,
}

impl FishActivityResult {
    pub fn level(&self) -> ActivityLevel {
        ActivityLevel::from_score(self.score)
    }
}
