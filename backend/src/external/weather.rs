//! Weather API client for fetching current conditions
//!
//! Integrates with the Open-Meteo forecast API. The pressure trend is derived
//! from the last few hours of mean sea-level pressure returned alongside the
//! current values.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use shared::{GpsCoordinates, PressureTrend, WeatherSnapshot};

use super::{check_status, http_client, WeatherProvider};
use crate::error::{AppError, AppResult};

/// Hours of pressure history used to classify the trend
const PRESSURE_HISTORY_HOURS: u32 = 3;

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,pressure_msl,wind_speed_10m,cloud_cover";

/// Open-Meteo API client
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

/// Open-Meteo forecast response
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    time: String,
    temperature_2m: f64,
    relative_humidity_2m: f64,
    pressure_msl: f64,
    wind_speed_10m: f64,
    cloud_cover: f64,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    pressure_msl: Vec<Option<f64>>,
}

impl OpenMeteoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch current conditions and classify the pressure trend
    pub async fn get_current_weather(&self, coordinates: GpsCoordinates) -> AppResult<WeatherSnapshot> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current={}&hourly=pressure_msl&past_hours={}&forecast_hours=1&wind_speed_unit=kmh&timezone=UTC",
            self.base_url,
            coordinates.latitude,
            coordinates.longitude,
            CURRENT_FIELDS,
            PRESSURE_HISTORY_HOURS
        );

        let response = self.client.get(&url).send().await?;
        let response = check_status("Open-Meteo", response).await?;

        let data: ForecastResponse = response.json().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("Failed to parse weather response: {}", e))
        })?;

        Ok(convert_response(data))
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn current_weather(&self, coordinates: GpsCoordinates) -> AppResult<WeatherSnapshot> {
        self.get_current_weather(coordinates).await
    }
}

fn convert_response(data: ForecastResponse) -> WeatherSnapshot {
    let current = data.current;
    let previous_pressure = data
        .hourly
        .and_then(|hourly| hourly.pressure_msl.into_iter().flatten().next());

    WeatherSnapshot {
        timestamp: parse_time(&current.time).unwrap_or_else(Utc::now),
        temperature_celsius: current.temperature_2m,
        humidity_percent: current.relative_humidity_2m,
        pressure_hpa: current.pressure_msl,
        wind_speed_kmh: current.wind_speed_10m,
        cloud_cover_percent: current.cloud_cover,
        pressure_trend: previous_pressure
            .map(|previous| PressureTrend::classify(previous, current.pressure_msl)),
    }
}

/// Open-Meteo returns ISO-8601 local times without an offset (`2024-05-01T06:00`)
fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(hourly: Option<Vec<Option<f64>>>) -> ForecastResponse {
        ForecastResponse {
            current: CurrentBlock {
                time: "2024-05-01T06:00".to_string(),
                temperature_2m: 14.2,
                relative_humidity_2m: 81.0,
                pressure_msl: 1008.0,
                wind_speed_10m: 9.5,
                cloud_cover: 60.0,
            },
            hourly: hourly.map(|pressure_msl| HourlyBlock { pressure_msl }),
        }
    }

    #[test]
    fn test_trend_from_oldest_reading() {
        let snapshot = convert_response(response(Some(vec![Some(1011.0), Some(1009.5), Some(1008.0)])));
        assert_eq!(snapshot.pressure_trend, Some(PressureTrend::Falling));
        assert_eq!(snapshot.timestamp.to_rfc3339(), "2024-05-01T06:00:00+00:00");
    }

    #[test]
    fn test_missing_history_leaves_trend_unset() {
        let snapshot = convert_response(response(None));
        assert_eq!(snapshot.pressure_trend, None);
        let snapshot = convert_response(response(Some(vec![None, None])));
        assert_eq!(snapshot.pressure_trend, None);
    }
}
