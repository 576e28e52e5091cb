//! API route definitions.

use axum::{
    Json, Router, middleware,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::auth::auth_middleware};
use remit_core::ledger::LedgerError;
use remit_shared::AppError;

pub mod accounts;
pub mod auth;
pub mod health;
pub mod transfers;

/// Creates the API router with public and protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(accounts::routes())
        .merge(transfers::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new().merge(auth::routes()).merge(protected_routes)
}

/// Renders a ledger error as an HTTP response.
///
/// Client errors carry the domain message; server errors are logged and
/// replaced with a generic message so internals never leak.
pub(crate) fn ledger_error_response(err: &LedgerError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if status.is_server_error() {
        error!(error = %err, "ledger operation failed");
        "An error occurred".to_string()
    } else {
        err.to_string()
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message
        })),
    )
        .into_response()
}

/// Renders a harness-level error as an HTTP response.
///
/// Same policy as `ledger_error_response`: 5xx details stay in the logs.
pub(crate) fn app_error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if status.is_server_error() {
        error!(error = %err, "request failed");
        "An error occurred".to_string()
    } else {
        err.to_string()
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message
        })),
    )
        .into_response()
}
