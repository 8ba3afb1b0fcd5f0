//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod dashboard;
pub mod finance;
pub mod health;
pub mod ledgers;
pub mod loans;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(loans::routes())
        .merge(ledgers::routes())
        .merge(finance::routes())
        .merge(dashboard::routes())
}
