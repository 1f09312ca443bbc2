//! Shared fixtures for backend integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fishspot_backend::config::{
    AlertsConfig, Config, CronConfig, DatabaseConfig, ProvidersConfig, ScoringConfig, ServerConfig,
};
use fishspot_backend::error::{AppError, AppResult};
use fishspot_backend::external::{FloodVigilanceProvider, FlowProvider, Providers, WeatherProvider};
use fishspot_backend::services::{AlertEngine, AlertPolicy, ScoringService, ScoringSettings};
use fishspot_backend::store::MemoryStore;
use shared::{
    AlertSubscription, AlertType, FloodVigilance, FlowObservation, FlowStatus, GpsCoordinates,
    PressureTrend, Spot, VigilanceLevel, WeatherSnapshot,
};
use uuid::Uuid;

pub const CRON_SECRET: &str = "test-cron-secret";

/// Fixed evaluation instant: a May morning, 7h local time
pub fn evaluation_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 14, 6, 0, 0).unwrap()
}

pub fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://localhost/fishspot_test".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        providers: ProvidersConfig {
            weather_endpoint: "http://localhost".to_string(),
            hydrology_endpoint: "http://localhost".to_string(),
            vigicrues_endpoint: "http://localhost".to_string(),
            timeout_secs: 1,
        },
        scoring: ScoringConfig {
            utc_offset_minutes: 60,
            cache_ttl_secs: 300,
        },
        alerts: AlertsConfig {
            default_threshold: 75.0,
            ideal_conditions_cooldown_hours: 12,
            water_level_cooldown_hours: 24,
            regulation_cooldown_hours: 168,
            custom_activity_cooldown_hours: 6,
            card_expiry_warning_days: 30,
            max_concurrent_users: 4,
            schedule_interval_minutes: 0,
        },
        cron: CronConfig {
            secret: CRON_SECRET.to_string(),
        },
    }
}

pub fn good_weather() -> WeatherSnapshot {
    WeatherSnapshot {
        timestamp: evaluation_time(),
        temperature_celsius: 16.0,
        humidity_percent: 75.0,
        pressure_hpa: 1009.0,
        wind_speed_kmh: 10.0,
        cloud_cover_percent: 60.0,
        pressure_trend: Some(PressureTrend::Falling),
    }
}

// ============================================================================
// Stub Providers
// ============================================================================

/// Weather provider returning a fixed snapshot and counting calls
pub struct StubWeather {
    snapshot: WeatherSnapshot,
    pub calls: AtomicUsize,
}

impl StubWeather {
    pub fn new(snapshot: WeatherSnapshot) -> Self {
        Self {
            snapshot,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for StubWeather {
    async fn current_weather(&self, _coordinates: GpsCoordinates) -> AppResult<WeatherSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.clone())
    }
}

pub struct FailingWeather;

#[async_trait]
impl WeatherProvider for FailingWeather {
    async fn current_weather(&self, _coordinates: GpsCoordinates) -> AppResult<WeatherSnapshot> {
        Err(AppError::UpstreamUnavailable("weather down".to_string()))
    }
}

pub struct StubFlow(pub Option<FlowStatus>);

#[async_trait]
impl FlowProvider for StubFlow {
    async fn flow_status(&self, _coordinates: GpsCoordinates) -> AppResult<Option<FlowObservation>> {
        Ok(self.0.map(|status| FlowObservation {
            status,
            label: status.as_str().to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 13).unwrap(),
        }))
    }
}

pub struct FailingFlow;

#[async_trait]
impl FlowProvider for FailingFlow {
    async fn flow_status(&self, _coordinates: GpsCoordinates) -> AppResult<Option<FlowObservation>> {
        Err(AppError::UpstreamUnavailable("hubeau down".to_string()))
    }
}

/// Flow provider that never answers in time
pub struct SlowFlow;

#[async_trait]
impl FlowProvider for SlowFlow {
    async fn flow_status(&self, _coordinates: GpsCoordinates) -> AppResult<Option<FlowObservation>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }
}

pub struct StubVigilance(pub Option<VigilanceLevel>);

#[async_trait]
impl FloodVigilanceProvider for StubVigilance {
    async fn flood_vigilance(&self, _station_code: &str) -> AppResult<Option<FloodVigilance>> {
        Ok(self.0.map(|level| FloodVigilance {
            level,
            troncon_name: "Garonne agenaise".to_string(),
        }))
    }
}

pub fn providers(
    weather: Arc<dyn WeatherProvider>,
    flow: Arc<dyn FlowProvider>,
    vigilance: Arc<dyn FloodVigilanceProvider>,
) -> Providers {
    Providers {
        weather,
        flow,
        vigilance,
    }
}

/// Good weather, flowing river, no vigilance
pub fn calm_providers() -> Providers {
    providers(
        Arc::new(StubWeather::new(good_weather())),
        Arc::new(StubFlow(Some(FlowStatus::Flowing))),
        Arc::new(StubVigilance(None)),
    )
}

// ============================================================================
// Builders
// ============================================================================

pub fn scoring_service(store: Arc<MemoryStore>, providers: Providers) -> Arc<ScoringService> {
    Arc::new(ScoringService::new(
        store,
        providers,
        ScoringSettings {
            provider_timeout: Duration::from_millis(200),
            ..ScoringSettings::default()
        },
    ))
}

pub fn engine(store: Arc<MemoryStore>, providers: Providers, policy: AlertPolicy) -> AlertEngine {
    let scoring = scoring_service(store.clone(), providers);
    AlertEngine::new(store, scoring, policy)
}

pub fn spot(name: &str, static_score: f64) -> Spot {
    Spot {
        id: Uuid::new_v4(),
        name: name.to_string(),
        coordinates: GpsCoordinates::new(44.84, -0.58),
        static_score,
        hydro_station_code: Some("O9620010".to_string()),
        department: Some("33".to_string()),
    }
}

pub fn subscription(
    user_id: Uuid,
    alert_type: AlertType,
    spot_id: Option<Uuid>,
    config: serde_json::Value,
) -> AlertSubscription {
    AlertSubscription {
        id: Uuid::new_v4(),
        user_id,
        alert_type,
        spot_id,
        config,
        is_active: true,
        last_triggered: None,
    }
}
