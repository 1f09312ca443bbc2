//! Fishing spot and spot score models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::activity::{ActivityFactor, ActivityLevel};
use crate::models::water::WaterConditions;
use crate::models::weather::WeatherSnapshot;
use crate::types::GpsCoordinates;

/// A fishing spot as the scoring engine sees it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Spot {
    pub id: Uuid,
    pub name: String,
    pub coordinates: GpsCoordinates,
    /// Slow-changing baseline quality (0-100), maintained outside the engine
    pub static_score: f64,
    /// Hydrometric station used for flood vigilance lookups
    pub hydro_station_code: Option<String>,
    /// French department code ("33", "2A", ...)
    pub department: Option<String>,
}

/// Publicly displayed score for a spot at a point in time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpotScore {
    pub spot_id: Uuid,
    pub static_score: f64,
    pub dynamic_score: u8,
    pub fishability_score: u8,
    pub level: ActivityLevel,
    pub factors: Vec<ActivityFactor>,
    pub weather: Option<WeatherSnapshot>,
    pub water: WaterConditions,
    pub computed_at: DateTime<Utc>,
}
