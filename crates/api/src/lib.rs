//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Request/response types

pub mod middleware;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use remit_core::ledger::BalanceCache;
use remit_db::{AccountRepository, TransferRepository, UserRepository};
use remit_shared::JwtService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Account repository (shares one balance cache per process).
    pub accounts: AccountRepository,
    /// User repository.
    pub users: UserRepository,
    /// Transfer repository.
    pub transfers: TransferRepository,
}

impl AppState {
    /// Wires repositories around one database connection and one balance
    /// cache.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_service: JwtService, cache: BalanceCache) -> Self {
        let accounts = AccountRepository::new(db.clone(), cache);
        let users = UserRepository::new(db.clone());
        let transfers = TransferRepository::new(db.clone(), accounts.clone(), users.clone());

        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            accounts,
            users,
            transfers,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .merge(routes::health::routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
