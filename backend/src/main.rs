//! FishSpot backend server
//!
//! Serves spot fishability scores and runs the alert engine, either on an
//! external cron trigger or on an in-process schedule.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use fishspot_backend::{
    config::Config, create_app, external::Providers, scheduler, store::PgStore, AppState,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "fishspot_server=debug,fishspot_backend=debug,tower_http=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting FishSpot server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    // Create application state
    let store = Arc::new(PgStore::new(db_pool.clone()));
    let providers = Providers::from_config(&config.providers);
    let state = AppState::new(config.clone(), store, providers, Some(db_pool))?;

    if config.alerts.schedule_interval_minutes > 0 {
        tokio::spawn(scheduler::start_alert_scheduler(
            state.alerts.clone(),
            config.alerts.schedule_interval_minutes,
        ));
    }

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
