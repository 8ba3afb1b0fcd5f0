//! Loan lifecycle service.
//!
//! Orchestrates the pure ledger rules, the loan store and the profit ledger.
//! Every mutation of an existing loan runs through an optimistic
//! read-modify-write loop: the record is loaded, the rule is applied, and the
//! store accepts the write only if the version is unchanged. On a conflict the
//! rule is re-applied to a fresh snapshot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lendbook_shared::types::{LoanId, PageRequest, PageResponse};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::error::{LoanError, StoreError};
use super::ledger::{self, ManualProfitChange};
use super::store::{LoanStore, ProfitLedger};
use super::types::{LoanHistory, LoanPatch, LoanRecord, NewLoan, RolloverTerms};
use crate::profit::{self, ManualProfit, ResetSummary};
use crate::query::{LoanCriteria, LoanSort};

/// Default number of optimistic write attempts.
pub const DEFAULT_MAX_WRITE_ATTEMPTS: u32 = 5;

/// Loan lifecycle service.
pub struct LoanService<S: LoanStore, P: ProfitLedger> {
    loans: Arc<S>,
    profits: Arc<P>,
    max_write_attempts: u32,
}

impl<S: LoanStore, P: ProfitLedger> LoanService<S, P> {
    /// Create a new loan service.
    #[must_use]
    pub fn new(loans: Arc<S>, profits: Arc<P>) -> Self {
        Self {
            loans,
            profits,
            max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
        }
    }

    /// Sets how many times a conflicting write is retried. At least one
    /// attempt is always made.
    #[must_use]
    pub fn with_max_write_attempts(mut self, attempts: u32) -> Self {
        self.max_write_attempts = attempts.max(1);
        self
    }

    /// Create a loan and reconcile its manual profit.
    pub async fn create_loan(&self, input: &NewLoan) -> Result<LoanRecord, LoanError> {
        let loan = ledger::build_loan(input, LoanId::new(), Utc::now())?;
        let saved = self.loans.create(&loan).await?;
        info!(loan_id = %saved.id, phone = %saved.phone, amount = %saved.loan_amount, "Loan created");

        if saved.has_manual_profit() {
            self.reconcile(&saved, saved.created_at).await?;
        }
        Ok(saved)
    }

    /// Fetch a loan.
    pub async fn get_loan(&self, id: LoanId) -> Result<LoanRecord, LoanError> {
        self.loans
            .find_by_id(id)
            .await?
            .ok_or(LoanError::NotFound(id))
    }

    /// Borrower summary plus installment history.
    pub async fn loan_history(&self, id: LoanId) -> Result<LoanHistory, LoanError> {
        let loan = self.get_loan(id).await?;
        Ok(LoanHistory::from(&loan))
    }

    /// One page of loans matching `criteria`.
    pub async fn list_loans(
        &self,
        criteria: &LoanCriteria,
        sort: LoanSort,
        page: PageRequest,
    ) -> Result<PageResponse<LoanRecord>, LoanError> {
        let total = self.loans.count(criteria).await?;
        let loans = self.loans.find(criteria, sort, Some(page)).await?;
        Ok(PageResponse::new(loans, page, total))
    }

    /// Every loan matching `criteria`, for aggregates and exports.
    pub async fn all_loans(
        &self,
        criteria: &LoanCriteria,
        sort: LoanSort,
    ) -> Result<Vec<LoanRecord>, LoanError> {
        Ok(self.loans.find(criteria, sort, None).await?)
    }

    /// Apply a partial update.
    pub async fn update_loan(&self, id: LoanId, patch: &LoanPatch) -> Result<LoanRecord, LoanError> {
        let (saved, change) = self
            .write_with_retry(id, |loan, now| ledger::apply_patch(loan, patch, now))
            .await?;
        info!(loan_id = %id, version = saved.version, "Loan updated");

        if saved.has_manual_profit() {
            self.reconcile(&saved, saved.updated_at).await?;
        } else if change == ManualProfitChange::Cleared {
            let removed = self.profits.delete_by_loan_ref(id).await?;
            info!(loan_id = %id, removed, "Manual profit cleared");
        }
        Ok(saved)
    }

    /// Record an installment.
    pub async fn apply_installment(
        &self,
        id: LoanId,
        amount: Decimal,
    ) -> Result<LoanRecord, LoanError> {
        let (saved, ()) = self
            .write_with_retry(id, |loan, now| ledger::apply_installment(loan, amount, now))
            .await?;
        info!(
            loan_id = %id,
            amount = %amount,
            remaining = %saved.remaining_loan,
            status = %saved.status,
            "Installment applied"
        );
        Ok(saved)
    }

    /// Start a new loan cycle for the borrower's most recent loan.
    pub async fn rollover_loan(&self, terms: &RolloverTerms) -> Result<LoanRecord, LoanError> {
        let phone = terms.phone.trim();
        if phone.is_empty() {
            return Err(LoanError::validation("Phone number is required"));
        }
        let existing = self
            .loans
            .find_latest_by_phone(phone)
            .await?
            .ok_or_else(|| LoanError::PhoneNotFound(phone.to_string()))?;

        let (saved, change) = self
            .write_with_retry(existing.id, |loan, now| ledger::apply_rollover(loan, terms, now))
            .await?;
        info!(loan_id = %saved.id, cycle = saved.cycle, amount = %saved.loan_amount, "Loan rolled over");

        if saved.has_manual_profit() {
            self.reconcile(&saved, saved.updated_at).await?;
        } else if change == ManualProfitChange::Cleared {
            let removed = self.profits.delete_by_loan_ref(saved.id).await?;
            info!(loan_id = %saved.id, removed, "Manual profit cleared on rollover");
        }
        Ok(saved)
    }

    /// Delete a loan and its linked profit entries.
    pub async fn delete_loan(&self, id: LoanId) -> Result<(), LoanError> {
        if self.loans.find_by_id(id).await?.is_none() {
            return Err(LoanError::NotFound(id));
        }
        let removed = self.profits.delete_by_loan_ref(id).await?;
        if !self.loans.delete_by_id(id).await? {
            return Err(LoanError::NotFound(id));
        }
        info!(loan_id = %id, profits_removed = removed, "Loan deleted");
        Ok(())
    }

    /// Delete every profit entry and clear every loan's manual profit.
    pub async fn reset_all_profits(&self) -> Result<ResetSummary, LoanError> {
        Ok(profit::reset_all_profits(self.loans.as_ref(), self.profits.as_ref()).await?)
    }

    async fn reconcile(&self, loan: &LoanRecord, booked_at: DateTime<Utc>) -> Result<(), LoanError> {
        profit::upsert_manual_profit(
            self.profits.as_ref(),
            &ManualProfit::from_loan(loan, booked_at),
            Utc::now(),
        )
        .await?;
        Ok(())
    }

    /// Load, mutate and conditionally write a loan, retrying on conflicts.
    async fn write_with_retry<F, R>(
        &self,
        id: LoanId,
        mut apply: F,
    ) -> Result<(LoanRecord, R), LoanError>
    where
        F: FnMut(&mut LoanRecord, DateTime<Utc>) -> Result<R, LoanError> + Send,
        R: Send,
    {
        for attempt in 1..=self.max_write_attempts {
            let mut loan = self
                .loans
                .find_by_id(id)
                .await?
                .ok_or(LoanError::NotFound(id))?;
            let expected_version = loan.version;
            let outcome = apply(&mut loan, Utc::now())?;

            match self.loans.update(&loan, expected_version).await {
                Ok(saved) => return Ok((saved, outcome)),
                Err(StoreError::Conflict) => {
                    warn!(loan_id = %id, attempt, "Concurrent loan modification, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
        warn!(loan_id = %id, attempts = self.max_write_attempts, "Giving up after repeated conflicts");
        Err(LoanError::ConcurrentModification)
    }
}
