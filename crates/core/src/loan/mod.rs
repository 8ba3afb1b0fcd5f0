//! Loan installment ledger.
//!
//! This module implements the loan side of the system:
//! - Loan records with running balances and append-only installments
//! - Pure ledger rules (create, installment, patch, rollover)
//! - Store contracts implemented by the db crate
//! - The lifecycle service with optimistic write retries

pub mod error;
pub mod ledger;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod ledger_props;

pub use error::{LoanError, StoreError};
pub use ledger::{
    ManualProfitChange, apply_installment, apply_patch, apply_rollover, build_loan,
    derive_due_installments, normalize_loan_type, normalize_manual_profit,
};
pub use service::{DEFAULT_MAX_WRITE_ATTEMPTS, LoanService};
pub use store::{LoanStore, ProfitLedger};
pub use types::{
    AmountInput, HistoryItem, Installment, LoanHistory, LoanPatch, LoanRecord, LoanStatus,
    LoanType, NewLoan, RolloverTerms,
};
