//! Persistence contracts for loans and linked profit entries.
//!
//! These traits are implemented by the db crate; the core crate only ships
//! in-memory fakes for tests.

use std::future::Future;

use lendbook_shared::types::{LoanId, PageRequest};

use super::error::StoreError;
use super::types::LoanRecord;
use crate::finance::ProfitEntry;
use crate::query::{LoanCriteria, LoanSort};

/// Repository trait for loan persistence.
pub trait LoanStore: Send + Sync {
    /// Loans matching `criteria`, sorted and paginated.
    fn find(
        &self,
        criteria: &LoanCriteria,
        sort: LoanSort,
        page: Option<PageRequest>,
    ) -> impl Future<Output = Result<Vec<LoanRecord>, StoreError>> + Send;

    /// Number of loans matching `criteria`.
    fn count(&self, criteria: &LoanCriteria) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Find a loan by ID, including its installments.
    fn find_by_id(
        &self,
        id: LoanId,
    ) -> impl Future<Output = Result<Option<LoanRecord>, StoreError>> + Send;

    /// Most recently created loan for a phone number.
    fn find_latest_by_phone(
        &self,
        phone: &str,
    ) -> impl Future<Output = Result<Option<LoanRecord>, StoreError>> + Send;

    /// Insert a new loan.
    fn create(
        &self,
        loan: &LoanRecord,
    ) -> impl Future<Output = Result<LoanRecord, StoreError>> + Send;

    /// Persist `loan` if the stored version still equals `expected_version`.
    ///
    /// Appends installments beyond those already stored and bumps the version.
    /// Returns `StoreError::Conflict` when another writer got there first.
    fn update(
        &self,
        loan: &LoanRecord,
        expected_version: i64,
    ) -> impl Future<Output = Result<LoanRecord, StoreError>> + Send;

    /// Delete a loan. Returns false when it did not exist.
    fn delete_by_id(&self, id: LoanId) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Null the manual profit on every loan. Returns the number of loans touched.
    fn clear_manual_profits(&self) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// Repository trait for the profit entries linked to loans.
pub trait ProfitLedger: Send + Sync {
    /// Entry linked to a loan, if any.
    fn find_by_loan_ref(
        &self,
        loan_id: LoanId,
    ) -> impl Future<Output = Result<Option<ProfitEntry>, StoreError>> + Send;

    /// Insert or overwrite the entry, keyed by its loan reference.
    fn upsert(
        &self,
        entry: &ProfitEntry,
    ) -> impl Future<Output = Result<ProfitEntry, StoreError>> + Send;

    /// Delete entries linked to a loan. Returns the number removed.
    fn delete_by_loan_ref(
        &self,
        loan_id: LoanId,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Delete every profit entry. Returns the number removed.
    fn delete_all(&self) -> impl Future<Output = Result<u64, StoreError>> + Send;
}
