//! In-memory store fakes for service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use lendbook_shared::types::{LoanId, PageRequest};

use crate::finance::ProfitEntry;
use crate::loan::{LoanRecord, LoanStore, ProfitLedger, StoreError};
use crate::query::{LoanCriteria, LoanSort};

/// Loan store backed by a `HashMap`, with optional injected conflicts.
#[derive(Default)]
pub struct InMemoryLoanStore {
    loans: Mutex<HashMap<LoanId, LoanRecord>>,
    forced_conflicts: AtomicU32,
}

impl InMemoryLoanStore {
    /// Makes the next `n` updates fail with a conflict.
    pub fn force_conflicts(&self, n: u32) {
        self.forced_conflicts.store(n, Ordering::SeqCst);
    }

    /// Inserts a record as-is.
    pub fn insert(&self, loan: LoanRecord) {
        self.loans.lock().unwrap().insert(loan.id, loan);
    }

    /// Snapshot of a stored record.
    pub fn get(&self, id: LoanId) -> Option<LoanRecord> {
        self.loans.lock().unwrap().get(&id).cloned()
    }
}

impl LoanStore for InMemoryLoanStore {
    async fn find(
        &self,
        criteria: &LoanCriteria,
        sort: LoanSort,
        page: Option<PageRequest>,
    ) -> Result<Vec<LoanRecord>, StoreError> {
        let mut loans: Vec<LoanRecord> = self
            .loans
            .lock()
            .unwrap()
            .values()
            .filter(|l| criteria.matches(l))
            .cloned()
            .collect();
        sort.sort(&mut loans);
        Ok(match page {
            Some(page) => loans
                .into_iter()
                .skip(usize::try_from(page.offset()).unwrap())
                .take(usize::try_from(page.limit()).unwrap())
                .collect(),
            None => loans,
        })
    }

    async fn count(&self, criteria: &LoanCriteria) -> Result<u64, StoreError> {
        let loans = self.loans.lock().unwrap();
        Ok(loans.values().filter(|l| criteria.matches(l)).count() as u64)
    }

    async fn find_by_id(&self, id: LoanId) -> Result<Option<LoanRecord>, StoreError> {
        Ok(self.get(id))
    }

    async fn find_latest_by_phone(&self, phone: &str) -> Result<Option<LoanRecord>, StoreError> {
        let loans = self.loans.lock().unwrap();
        Ok(loans
            .values()
            .filter(|l| l.phone == phone)
            .max_by_key(|l| l.created_at)
            .cloned())
    }

    async fn create(&self, loan: &LoanRecord) -> Result<LoanRecord, StoreError> {
        let mut stored = loan.clone();
        stored.version = 1;
        self.insert(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        loan: &LoanRecord,
        expected_version: i64,
    ) -> Result<LoanRecord, StoreError> {
        if self
            .forced_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::Conflict);
        }
        let mut loans = self.loans.lock().unwrap();
        let current = loans.get_mut(&loan.id).ok_or(StoreError::Conflict)?;
        if current.version != expected_version {
            return Err(StoreError::Conflict);
        }
        let mut stored = loan.clone();
        stored.version = expected_version + 1;
        *current = stored.clone();
        Ok(stored)
    }

    async fn delete_by_id(&self, id: LoanId) -> Result<bool, StoreError> {
        Ok(self.loans.lock().unwrap().remove(&id).is_some())
    }

    async fn clear_manual_profits(&self) -> Result<u64, StoreError> {
        let mut loans = self.loans.lock().unwrap();
        let mut cleared = 0;
        for loan in loans.values_mut() {
            if loan.manual_profit.take().is_some() {
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}

/// Profit ledger backed by a `Vec`, enforcing one entry per loan reference.
#[derive(Default)]
pub struct InMemoryProfitLedger {
    entries: Mutex<Vec<ProfitEntry>>,
}

impl InMemoryProfitLedger {
    /// Snapshot of all entries.
    pub fn entries(&self) -> Vec<ProfitEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Inserts an entry as-is.
    pub fn push(&self, entry: ProfitEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}

impl ProfitLedger for InMemoryProfitLedger {
    async fn find_by_loan_ref(&self, loan_id: LoanId) -> Result<Option<ProfitEntry>, StoreError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .find(|e| e.loan_ref == Some(loan_id))
            .cloned())
    }

    async fn upsert(&self, entry: &ProfitEntry) -> Result<ProfitEntry, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let slot = entries
            .iter_mut()
            .find(|e| entry.loan_ref.is_some() && e.loan_ref == entry.loan_ref);
        match slot {
            Some(existing) => {
                let created_at = existing.created_at;
                let id = existing.id;
                *existing = ProfitEntry {
                    id,
                    created_at,
                    ..entry.clone()
                };
                Ok(existing.clone())
            }
            None => {
                entries.push(entry.clone());
                Ok(entry.clone())
            }
        }
    }

    async fn delete_by_loan_ref(&self, loan_id: LoanId) -> Result<u64, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.loan_ref != Some(loan_id));
        Ok((before - entries.len()) as u64)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }
}
