//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - The `{status, message, data}` response envelope
//! - CSV report exports

pub mod export;
pub mod response;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use lendbook_core::loan::LoanService;
use lendbook_db::{LoanRepository, ProfitRepository};
use lendbook_shared::config::LedgerConfig;
use lendbook_shared::types::PageRequest;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Loan service over the Postgres repositories.
pub type PgLoanService = LoanService<LoanRepository, ProfitRepository>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Write retry and paging limits.
    pub ledger: LedgerConfig,
}

impl AppState {
    /// Creates the state.
    #[must_use]
    pub fn new(db: DatabaseConnection, ledger: LedgerConfig) -> Self {
        Self {
            db: Arc::new(db),
            ledger,
        }
    }

    /// Loan service bound to this state's pool.
    #[must_use]
    pub fn loan_service(&self) -> PgLoanService {
        LoanService::new(
            Arc::new(LoanRepository::new(self.connection())),
            Arc::new(ProfitRepository::new(self.connection())),
        )
        .with_max_write_attempts(self.ledger.max_write_attempts)
    }

    /// Pool handle for repositories.
    #[must_use]
    pub fn connection(&self) -> DatabaseConnection {
        (*self.db).clone()
    }

    /// Page request with configured defaults and limits.
    #[must_use]
    pub fn page(&self, page: Option<u32>, per_page: Option<u32>) -> PageRequest {
        PageRequest::new(
            page.unwrap_or(1),
            per_page.unwrap_or(self.ledger.default_page_size),
            self.ledger.max_page_size,
        )
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
