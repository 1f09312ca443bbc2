//! FishSpot backend
//!
//! Spot scoring and alert evaluation, exposed through a small HTTP API.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod scheduler;
pub mod services;
pub mod store;

pub use config::Config;

use error::AppResult;
use external::Providers;
use services::{AlertEngine, AlertPolicy, ScoreCache, ScoringService, ScoringSettings};
use store::Store;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Present when running against PostgreSQL
    pub db: Option<sqlx::PgPool>,
    pub scoring: Arc<ScoringService>,
    pub alerts: Arc<AlertEngine>,
    pub score_cache: Arc<ScoreCache>,
}

impl AppState {
    /// Wire the services together over a store and a set of providers
    pub fn new<S>(
        config: Config,
        store: Arc<S>,
        providers: Providers,
        db: Option<sqlx::PgPool>,
    ) -> AppResult<Self>
    where
        S: Store + 'static,
    {
        let settings = ScoringSettings::from_config(&config)?;
        let scoring = Arc::new(ScoringService::new(store.clone(), providers, settings));
        let alerts = Arc::new(AlertEngine::new(
            store,
            scoring.clone(),
            AlertPolicy::from_config(&config.alerts),
        ));
        let score_cache = Arc::new(ScoreCache::new(Duration::from_secs(
            config.scoring.cache_ttl_secs,
        )));

        Ok(Self {
            config: Arc::new(config),
            db,
            scoring,
            alerts,
            score_cache,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .nest("/api/cron", routes::cron_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "FishSpot API v1.0"
}
