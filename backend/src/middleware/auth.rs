//! Authentication middleware
//!
//! The cron trigger is called by an external scheduler that presents a shared
//! bearer secret.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::AppState;

/// Reject requests whose bearer token does not match `cron.secret`
pub async fn cron_auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    request: Request,
    next: Next,
) -> Response {
    let expected = state.config.cron.secret.as_str();
    if expected.is_empty() {
        tracing::warn!("Cron trigger called but no cron secret is configured");
        return AppError::Unauthorized("Cron secret not configured".to_string()).into_response();
    }

    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return AppError::Unauthorized("Missing or invalid Authorization header".to_string())
            .into_response();
    };

    if !secrets_match(bearer.token(), expected) {
        return AppError::Unauthorized("Invalid cron secret".to_string()).into_response();
    }

    next.run(request).await
}

/// Compare fixed-size digests so the comparison does not leak the secret length
fn secrets_match(provided: &str, expected: &str) -> bool {
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    provided
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
