//! Scheduled job triggers

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::AlertRunReport;
use crate::AppState;

/// Run the alert engine over every active subscription
pub async fn compute_alerts(State(state): State<AppState>) -> AppResult<Json<AlertRunReport>> {
    let report = state.alerts.run_all_alerts().await?;
    Ok(Json(report))
}
