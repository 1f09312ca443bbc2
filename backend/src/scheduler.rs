//! In-process alert scheduler
//!
//! Used when no external cron is configured to call the trigger endpoint.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tracing::{debug, error, info, instrument};

use crate::services::AlertEngine;

#[instrument(skip(engine), fields(interval_minutes = %interval_minutes))]
pub async fn start_alert_scheduler(engine: Arc<AlertEngine>, interval_minutes: u64) {
    let mut interval = time::interval(Duration::from_secs(interval_minutes.max(1) * 60));
    // A slow run delays the next tick instead of bunching them up
    interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    info!("Alert scheduler started with {} minute interval", interval_minutes);

    loop {
        interval.tick().await;
        debug!("Scheduler tick - running alert evaluation");

        match engine.run_all_alerts().await {
            Ok(report) => {
                info!(
                    users_processed = report.users_processed,
                    alerts_triggered = report.alerts_triggered,
                    errors = report.errors,
                    "Scheduled alert run completed"
                );
            }
            Err(e) => {
                error!("Scheduled alert run failed: {}", e);
            }
        }
    }
}
