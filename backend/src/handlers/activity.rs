//! Activity index preview

use axum::{body::Bytes, Json};
use shared::{calculate_fish_activity, ActivityInput, FishActivityResult};

use crate::error::{AppError, AppResult};

/// Compute the activity index for caller-supplied conditions.
///
/// The raw body is decoded here rather than by the `Json` extractor so
/// malformed JSON and unknown moon phases or pressure trends all come back
/// as validation errors.
pub async fn preview_activity(body: Bytes) -> AppResult<Json<FishActivityResult>> {
    let input: ActivityInput = serde_json::from_slice(&body).map_err(|e| AppError::Validation {
        field: None,
        message: format!("Invalid activity input: {}", e),
    })?;
    let result = calculate_fish_activity(&input)?;
    Ok(Json(result))
}
