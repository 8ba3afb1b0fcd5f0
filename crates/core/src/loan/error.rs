//! Loan ledger and store error types.

use lendbook_shared::types::LoanId;
use lendbook_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The record changed since it was loaded.
    #[error("Record was modified concurrently")]
    Conflict,

    /// The backing database failed.
    #[error("Database error: {0}")]
    Database(String),
}

/// Errors that can occur during loan operations.
#[derive(Debug, Error)]
pub enum LoanError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Installment larger than the outstanding balance.
    #[error(
        "The installment amount {amount} is higher than the remaining loan balance of {remaining}"
    )]
    AmountExceedsRemaining {
        /// Requested installment.
        amount: Decimal,
        /// Balance at the time of the request.
        remaining: Decimal,
    },

    /// Loan not found.
    #[error("Loan not found: {0}")]
    NotFound(LoanId),

    /// No loan exists for the phone number.
    #[error("No customer found with phone number {0}")]
    PhoneNotFound(String),

    /// Write attempts exhausted by concurrent writers.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LoanError {
    /// Shorthand for a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::AmountExceedsRemaining { .. } => "AMOUNT_EXCEEDS_REMAINING",
            Self::NotFound(_) => "LOAN_NOT_FOUND",
            Self::PhoneNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Store(StoreError::Conflict) => "CONFLICT",
            Self::Store(StoreError::Database(_)) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::AmountExceedsRemaining { .. } => 400,
            Self::NotFound(_) | Self::PhoneNotFound(_) => 404,
            Self::ConcurrentModification | Self::Store(StoreError::Conflict) => 409,
            Self::Store(StoreError::Database(_)) => 500,
        }
    }
}

impl From<LoanError> for AppError {
    fn from(err: LoanError) -> Self {
        match err {
            LoanError::Validation(_) | LoanError::AmountExceedsRemaining { .. } => {
                Self::Validation(err.to_string())
            }
            LoanError::NotFound(_) => Self::NotFound("Loan not found".to_string()),
            LoanError::PhoneNotFound(_) => Self::NotFound(err.to_string()),
            LoanError::ConcurrentModification | LoanError::Store(StoreError::Conflict) => {
                Self::Conflict(err.to_string())
            }
            LoanError::Store(StoreError::Database(msg)) => Self::Database(msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => Self::Conflict(err.to_string()),
            StoreError::Database(msg) => Self::Database(msg),
        }
    }
}
