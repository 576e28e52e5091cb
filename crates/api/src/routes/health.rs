//! Health check endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service name.
    pub service: &'static str,
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Liveness probe. Answers as long as the process is up; it deliberately
/// does not touch the database.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "remit",
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates the health check route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
