//! HTTP route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<OddsService>`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::service::{iso_timestamp, OddsService};
use crate::types::{GamesResponse, HealthResponse, League, OddsError};

pub type AppState = Arc<OddsService>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

impl OddsError {
    /// HTTP status a client sees for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            OddsError::Misconfigured(_) | OddsError::UnknownLeague(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            OddsError::RateLimited => StatusCode::SERVICE_UNAVAILABLE,
            OddsError::Provider { .. } | OddsError::Network(_) | OddsError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

/// Handler error: status from the `OddsError`, body `{"detail": message}`.
#[derive(Debug)]
pub struct ApiError(pub OddsError);

impl From<OddsError> for ApiError {
    fn from(err: OddsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        warn!(status = status.as_u16(), error = %self.0, "Request failed");
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

type ApiResult = Result<Json<GamesResponse>, ApiError>;

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        as_of: iso_timestamp(state.now()),
    })
}

/// GET /nfl/weekend
pub async fn nfl_weekend(State(state): State<AppState>) -> ApiResult {
    Ok(Json(state.weekend(League::Nfl).await?))
}

/// GET /nfl/today
pub async fn nfl_today(State(state): State<AppState>) -> ApiResult {
    Ok(Json(state.today(League::Nfl).await?))
}

/// GET /cfb/weekend
pub async fn cfb_weekend(State(state): State<AppState>) -> ApiResult {
    Ok(Json(state.weekend(League::Cfb).await?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
