//! Account routes: funding and balance reads.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::error;

use crate::{AppState, middleware::AuthUser, routes::ledger_error_response};
use remit_db::entities::accounts;
use remit_shared::types::AccountId;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/fund", post(fund_account))
        .route("/accounts/balance", get(get_balance))
}

/// Request body for funding an account.
#[derive(Debug, Deserialize)]
pub struct FundAccountRequest {
    /// Amount to deposit, as a decimal string (e.g. "10000" or "99.95").
    pub amount: String,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: AccountId,
    /// Current balance.
    pub balance: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<accounts::Model> for AccountResponse {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: AccountId::from_uuid(model.id),
            balance: model.balance.to_string(),
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// POST /accounts/fund - Deposit into the caller's own account.
///
/// A pure credit with no matching debit; the caller cannot fund anyone
/// else's account.
async fn fund_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<FundAccountRequest>,
) -> impl IntoResponse {
    let Ok(amount) = Decimal::from_str(&payload.amount) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "INVALID_AMOUNT",
                "message": format!("'{}' is not a valid decimal amount", payload.amount)
            })),
        )
            .into_response();
    };

    let account = match resolve_own_account(&state, auth.user_id()).await {
        Ok(account) => account,
        Err(response) => return response,
    };

    match state.accounts.fund(account.id, amount).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(json!({ "account": AccountResponse::from(updated) })),
        )
            .into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET /accounts/balance - Read the caller's balance through the cache.
async fn get_balance(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let account = match resolve_own_account(&state, auth.user_id()).await {
        Ok(account) => account,
        Err(response) => return response,
    };

    match state.accounts.get_balance(account.id).await {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({
                "account_id": AccountId::from_uuid(account.id),
                "balance": balance.to_string()
            })),
        )
            .into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// Resolves the authenticated user's account.
async fn resolve_own_account(
    state: &AppState,
    user_id: uuid::Uuid,
) -> Result<accounts::Model, axum::response::Response> {
    match state.accounts.find_by_owner(user_id).await {
        Ok(Some(account)) => Ok(account),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "ACCOUNT_NOT_FOUND",
                "message": "No account exists for this user"
            })),
        )
            .into_response()),
        Err(e) => {
            error!(error = %e, "Failed to resolve account");
            Err(ledger_error_response(&e))
        }
    }
}
