//! Hydrology models: river flow observations and flood vigilance

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::validation::ValidationError;

/// Observed flow state of a watercourse
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    Flowing,
    WeakFlow,
    Stagnant,
    Dry,
}

impl FlowStatus {
    /// Conditions worth alerting an angler about
    pub fn is_abnormal(&self) -> bool {
        matches!(self, FlowStatus::Stagnant | FlowStatus::Dry)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStatus::Flowing => "flowing",
            FlowStatus::WeakFlow => "weak_flow",
            FlowStatus::Stagnant => "stagnant",
            FlowStatus::Dry => "dry",
        }
    }
}

impl FromStr for FlowStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flowing" => Ok(FlowStatus::Flowing),
            "weak_flow" => Ok(FlowStatus::WeakFlow),
            "stagnant" => Ok(FlowStatus::Stagnant),
            "dry" => Ok(FlowStatus::Dry),
            other => Err(ValidationError::unknown("flow_status", other)),
        }
    }
}

/// Latest flow observation near a spot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowObservation {
    pub status: FlowStatus,
    pub label: String,
    pub date: NaiveDate,
}

/// Flood vigilance colour, ordered by severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VigilanceLevel {
    Green,
    Yellow,
    Orange,
    Red,
}

impl VigilanceLevel {
    /// Vigicrues numeric level (1 = green ... 4 = red)
    pub fn from_level(level: u8) -> Result<Self, ValidationError> {
        match level {
            1 => Ok(VigilanceLevel::Green),
            2 => Ok(VigilanceLevel::Yellow),
            3 => Ok(VigilanceLevel::Orange),
            4 => Ok(VigilanceLevel::Red),
            other => Err(ValidationError::unknown("vigilance_level", &other.to_string())),
        }
    }

    pub fn is_active(&self) -> bool {
        *self > VigilanceLevel::Green
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VigilanceLevel::Green => "green",
            VigilanceLevel::Yellow => "yellow",
            VigilanceLevel::Orange => "orange",
            VigilanceLevel::Red => "red",
        }
    }
}

impl FromStr for VigilanceLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "green" => Ok(VigilanceLevel::Green),
            "yellow" => Ok(VigilanceLevel::Yellow),
            "orange" => Ok(VigilanceLevel::Orange),
            "red" => Ok(VigilanceLevel::Red),
            other => Err(ValidationError::unknown("vigilance_level", other)),
        }
    }
}

/// Flood vigilance for the river section a station belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FloodVigilance {
    pub level: VigilanceLevel,
    pub troncon_name: String,
}

/// Live water signals for a spot; each part is `None` when its source was unavailable
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WaterConditions {
    pub flow: Option<FlowObservation>,
    pub vigilance: Option<FloodVigilance>,
}

impl WaterConditions {
    pub fn flow_status(&self) -> Option<FlowStatus> {
        self.flow.as_ref().map(|f| f.status)
    }

    pub fn vigilance_level(&self) -> Option<VigilanceLevel> {
        self.vigilance.as_ref().map(|v| v.level)
    }
}
