//! External API integrations
//!
//! Each live-data source sits behind a small trait so the scoring service can
//! be driven by the HTTP clients in production and by stubs in tests.

pub mod hydrology;
pub mod vigicrues;
pub mod weather;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{FloodVigilance, FlowObservation, GpsCoordinates, WeatherSnapshot};

use crate::config::ProvidersConfig;
use crate::error::AppResult;

pub use hydrology::HubEauClient;
pub use vigicrues::VigicruesClient;
pub use weather::OpenMeteoClient;

/// Current weather at a location
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self, coordinates: GpsCoordinates) -> AppResult<WeatherSnapshot>;
}

/// Latest water-flow observation near a location, `None` when no station reports
#[async_trait]
pub trait FlowProvider: Send + Sync {
    async fn flow_status(&self, coordinates: GpsCoordinates) -> AppResult<Option<FlowObservation>>;
}

/// Flood vigilance for the river section monitored by a hydrology station
#[async_trait]
pub trait FloodVigilanceProvider: Send + Sync {
    async fn flood_vigilance(&self, station_code: &str) -> AppResult<Option<FloodVigilance>>;
}

/// The live-data sources used to compute dynamic scores
#[derive(Clone)]
pub struct Providers {
    pub weather: Arc<dyn WeatherProvider>,
    pub flow: Arc<dyn FlowProvider>,
    pub vigilance: Arc<dyn FloodVigilanceProvider>,
}

impl Providers {
    /// HTTP clients for Open-Meteo, Hub'Eau and Vigicrues
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        Self {
            weather: Arc::new(OpenMeteoClient::new(config.weather_endpoint.clone(), timeout)),
            flow: Arc::new(HubEauClient::new(config.hydrology_endpoint.clone(), timeout)),
            vigilance: Arc::new(VigicruesClient::new(config.vigicrues_endpoint.clone(), timeout)),
        }
    }
}

/// Build a reqwest client with the per-call timeout applied
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("fishspot/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Turn a non-success HTTP status into an upstream error
pub(crate) async fn check_status(
    provider: &str,
    response: reqwest::Response,
) -> AppResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(crate::error::AppError::UpstreamUnavailable(format!(
        "{} API error: {} - {}",
        provider, status, body
    )))
}
