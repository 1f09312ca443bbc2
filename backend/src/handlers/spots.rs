//! HTTP handlers for spot scores

use axum::{
    extract::{Path, State},
    Json,
};
use shared::SpotScore;
use uuid::Uuid;

use crate::error::AppResult;
use crate::AppState;

/// Current fishability score of a spot, served from the short-lived cache
pub async fn get_spot_score(
    State(state): State<AppState>,
    Path(spot_id): Path<Uuid>,
) -> AppResult<Json<SpotScore>> {
    if let Some(score) = state.score_cache.get(spot_id).await {
        return Ok(Json(score));
    }

    let score = state.scoring.score_spot(spot_id).await?;
    state.score_cache.insert(score.clone()).await;
    Ok(Json(score))
}
