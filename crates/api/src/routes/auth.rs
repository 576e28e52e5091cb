//! Authentication routes for registration and login.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};
use validator::Validate;

use crate::{AppState, routes::app_error_response};
use remit_core::auth::{hash_password, verify_password};
use remit_db::repositories::UserError;
use remit_shared::AppError;
use remit_shared::auth::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use remit_shared::types::UserId;

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// POST /auth/register - Register a new user with a zero-balance account.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return app_error_response(&AppError::Validation(e.to_string()));
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return app_error_response(&AppError::Internal(e.to_string()));
        }
    };

    match state.users.register(&payload.username, &password_hash).await {
        Ok(user) => {
            info!(user_id = %user.id, "user registered via API");
            (
                StatusCode::CREATED,
                Json(json!({
                    "user": UserInfo {
                        id: UserId::from_uuid(user.id),
                        username: user.username,
                    }
                })),
            )
                .into_response()
        }
        Err(UserError::DuplicateUsername(username)) => app_error_response(&AppError::Conflict(
            format!("Username '{username}' is already taken"),
        )),
        Err(UserError::Database(e)) => app_error_response(&AppError::Database(e.to_string())),
    }
}

/// POST /auth/login - Authenticate and return an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    // A generic message for every failure mode, so login probes learn
    // nothing about which usernames exist.
    let rejection = || AppError::Unauthorized("Invalid username or password".to_string());

    if payload.validate().is_err() {
        return app_error_response(&rejection());
    }

    let user = match state.users.find_by_username(&payload.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(username = %payload.username, "Login attempt for unknown username");
            return app_error_response(&rejection());
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return app_error_response(&AppError::Database(e.to_string()));
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return app_error_response(&rejection());
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return app_error_response(&AppError::Internal(e.to_string()));
        }
    }

    let access_token = match state.jwt_service.issue_token(user.id) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return app_error_response(&AppError::Internal(e.to_string()));
        }
    };

    info!(user_id = %user.id, "User logged in successfully");

    let response = LoginResponse {
        user: UserInfo {
            id: UserId::from_uuid(user.id),
            username: user.username,
        },
        access_token,
        expires_in: state.jwt_service.token_ttl_secs(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
