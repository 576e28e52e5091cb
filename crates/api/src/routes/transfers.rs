//! Transfer routes: initiation and history.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use validator::Validate;

use crate::{AppState, middleware::AuthUser, routes::ledger_error_response};
use remit_db::entities::transfers;
use remit_db::repositories::{InitiateTransferInput, TransferFilter};
use remit_shared::types::{AccountId, PageRequest, TransferId};

/// Creates the transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transfers", post(initiate_transfer))
        .route("/transfers", get(list_transfers))
}

/// Request body for initiating a transfer.
#[derive(Debug, Deserialize, Validate)]
pub struct InitiateTransferRequest {
    /// Receiver's username.
    #[validate(length(min = 1, max = 64))]
    pub receiver: String,
    /// Amount to send, as a decimal string.
    pub amount: String,
}

/// Query parameters for listing transfers.
#[derive(Debug, Deserialize)]
pub struct ListTransfersQuery {
    /// Include transfers created at or after this instant (RFC 3339).
    pub start_period: Option<DateTime<Utc>>,
    /// Include transfers created at or before this instant (RFC 3339).
    pub end_period: Option<DateTime<Utc>>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Response for a transfer.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// Transfer ID.
    pub id: TransferId,
    /// Debited account.
    pub sender_account_id: AccountId,
    /// Credited account.
    pub receiver_account_id: AccountId,
    /// Amount moved.
    pub amount: String,
    /// Unique external reference.
    pub reference: String,
    /// Sender balance before the debit.
    pub balance_before: String,
    /// Sender balance after the debit.
    pub balance_after: String,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<transfers::Model> for TransferResponse {
    fn from(model: transfers::Model) -> Self {
        Self {
            id: TransferId::from_uuid(model.id),
            sender_account_id: AccountId::from_uuid(model.sender_account_id),
            receiver_account_id: AccountId::from_uuid(model.receiver_account_id),
            amount: model.amount.to_string(),
            reference: model.reference,
            balance_before: model.balance_before.to_string(),
            balance_after: model.balance_after.to_string(),
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// POST /transfers - Move money from the caller to another user.
async fn initiate_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<InitiateTransferRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": e.to_string()
            })),
        )
            .into_response();
    }

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

    let input = InitiateTransferInput {
        sender_user_id: auth.user_id(),
        receiver_username: payload.receiver,
        amount,
    };

    match state.transfers.initiate_transfer(input).await {
        Ok(transfer) => (
            StatusCode::CREATED,
            Json(json!({ "transfer": TransferResponse::from(transfer) })),
        )
            .into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET /transfers - List the caller's transfers, newest first.
///
/// The caller sees every transfer where they are sender or receiver;
/// `count` in the response is the total ignoring pagination.
async fn list_transfers(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransfersQuery>,
) -> impl IntoResponse {
    let filter = TransferFilter {
        start_period: query.start_period,
        end_period: query.end_period,
    };

    let mut page = PageRequest::default();
    if let Some(p) = query.page {
        page.page = p;
    }
    if let Some(per_page) = query.per_page {
        page.per_page = per_page.min(100);
    }

    match state.transfers.find(auth.user_id(), &filter, &page).await {
        Ok(result) => {
            let result = result.map(TransferResponse::from);
            (
                StatusCode::OK,
                Json(json!({
                    "records": result.records,
                    "count": result.count
                })),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn sample_model() -> transfers::Model {
        transfers::Model {
            id: Uuid::new_v4(),
            sender_account_id: Uuid::new_v4(),
            receiver_account_id: Uuid::new_v4(),
            amount: dec!(100),
            reference: "Ab3dE6gH9jK2".to_string(),
            balance_before: dec!(500),
            balance_after: dec!(400),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_transfer_response_renders_decimals_as_strings() {
        let model = sample_model();
        let response = TransferResponse::from(model.clone());

        assert_eq!(response.amount, "100");
        assert_eq!(response.balance_before, "500");
        assert_eq!(response.balance_after, "400");
        assert_eq!(response.reference, model.reference);
        assert_eq!(response.id.into_inner(), model.id);
    }

    #[test]
    fn test_transfer_request_validation() {
        let ok = InitiateTransferRequest {
            receiver: "bob".to_string(),
            amount: "10".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty_receiver = InitiateTransferRequest {
            receiver: String::new(),
            amount: "10".to_string(),
        };
        assert!(empty_receiver.validate().is_err());
    }
}
