//! HTTP surface: Axum router for the odds endpoints.
//!
//! CORS is open for GET so browser and mobile clients can call it directly.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::future::Future;
use tower_http::cors::CorsLayer;
use tracing::info;

pub use routes::{ApiError, AppState};

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("*"))
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::health))
        .route("/nfl/weekend", get(routes::nfl_weekend))
        .route("/nfl/today", get(routes::nfl_today))
        .route("/cfb/weekend", get(routes::cfb_weekend))
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<F>(state: AppState, addr: &str, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, "Odds API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
