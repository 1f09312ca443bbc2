//! Configuration management for the FishSpot backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FISHSPOT_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// External data providers
    pub providers: ProvidersConfig,

    /// Score computation settings
    pub scoring: ScoringConfig,

    /// Alert engine settings
    pub alerts: AlertsConfig,

    /// Cron trigger authentication
    pub cron: CronConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProvidersConfig {
    /// Open-Meteo forecast API base URL
    pub weather_endpoint: String,

    /// Hub'Eau API base URL
    pub hydrology_endpoint: String,

    /// Vigicrues API base URL
    pub vigicrues_endpoint: String,

    /// Per-call timeout applied to every provider request
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    /// Offset from UTC used to derive the local hour and month
    pub utc_offset_minutes: i32,

    /// How long a computed spot score is served from cache
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertsConfig {
    /// Threshold used when a subscription does not set one
    pub default_threshold: f64,

    pub ideal_conditions_cooldown_hours: i64,
    pub water_level_cooldown_hours: i64,
    pub regulation_cooldown_hours: i64,
    pub custom_activity_cooldown_hours: i64,

    /// Warn this many days before a fishing card expires
    pub card_expiry_warning_days: i64,

    /// Users evaluated concurrently in one batch run
    pub max_concurrent_users: usize,

    /// In-process schedule; 0 leaves scheduling to the external cron trigger
    pub schedule_interval_minutes: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CronConfig {
    /// Bearer secret expected on the cron trigger endpoint
    pub secret: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FISHSPOT_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("providers.weather_endpoint", "https://api.open-meteo.com/v1")?
            .set_default("providers.hydrology_endpoint", "https://hubeau.eaufrance.fr/api")?
            .set_default("providers.vigicrues_endpoint", "https://www.vigicrues.gouv.fr/services")?
            .set_default("providers.timeout_secs", 8)?
            .set_default("scoring.utc_offset_minutes", 60)?
            .set_default("scoring.cache_ttl_secs", 300)?
            .set_default("alerts.default_threshold", 75.0)?
            .set_default("alerts.ideal_conditions_cooldown_hours", 12)?
            .set_default("alerts.water_level_cooldown_hours", 24)?
            .set_default("alerts.regulation_cooldown_hours", 168)?
            .set_default("alerts.custom_activity_cooldown_hours", 6)?
            .set_default("alerts.card_expiry_warning_days", 30)?
            .set_default("alerts.max_concurrent_users", 4)?
            .set_default("alerts.schedule_interval_minutes", 0)?
            .set_default("cron.secret", "")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FISHSPOT_ prefix)
            .add_source(
                Environment::with_prefix("FISHSPOT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
