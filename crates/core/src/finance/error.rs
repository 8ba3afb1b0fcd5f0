//! Finance ledger error types.

use lendbook_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use super::types::LedgerKind;
use crate::loan::StoreError;

/// Errors that can occur during finance ledger operations.
#[derive(Debug, Error)]
pub enum FinanceError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Entry not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Ledger that was searched.
        kind: LedgerKind,
        /// Requested ID.
        id: Uuid,
    },

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FinanceError {
    /// Shorthand for a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Store(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 422,
            Self::NotFound { .. } => 404,
            Self::Store(_) => 500,
        }
    }
}

impl From<FinanceError> for AppError {
    fn from(err: FinanceError) -> Self {
        match err {
            FinanceError::Validation(msg) => Self::BusinessRule(msg),
            FinanceError::NotFound { kind, .. } => Self::NotFound(format!("{kind} not found")),
            FinanceError::Store(store) => store.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finance_status_codes() {
        assert_eq!(FinanceError::validation("x").http_status_code(), 422);
        assert_eq!(
            FinanceError::NotFound {
                kind: LedgerKind::Expense,
                id: Uuid::nil(),
            }
            .http_status_code(),
            404
        );
        assert_eq!(
            FinanceError::Store(StoreError::Database("down".into())).http_status_code(),
            500
        );
    }

    #[test]
    fn test_not_found_maps_to_app_error() {
        let app: AppError = FinanceError::NotFound {
            kind: LedgerKind::ReserveFund,
            id: Uuid::nil(),
        }
        .into();
        assert_eq!(app.status_code(), 404);
        assert_eq!(app.public_message(), "Reserve fund not found");

        let app: AppError = FinanceError::validation("Invalid date").into();
        assert_eq!(app.status_code(), 422);
    }
}
