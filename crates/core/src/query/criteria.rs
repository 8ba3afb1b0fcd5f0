//! Typed filters for loan and ledger listings.
//!
//! Each criteria value can be evaluated against an in-memory record and is
//! translated into a SQL condition by the db crate.

use chrono::NaiveDate;
use lendbook_shared::types::LoanId;
use serde::{Deserialize, Serialize};

use crate::finance::LedgerEntry;
use crate::loan::{LoanRecord, LoanStatus};

fn normalize_search(search: &str) -> Option<String> {
    let search = search.trim();
    (!search.is_empty()).then(|| search.to_string())
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Filter for loan queries.
///
/// An empty criteria matches every loan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanCriteria {
    /// Case-insensitive substring over name, phone and referrer.
    pub search: Option<String>,
    /// Exact status.
    pub status: Option<LoanStatus>,
    /// Loans starting on or after this date.
    pub start_from: Option<NaiveDate>,
    /// Loans ending on or before this date.
    pub end_to: Option<NaiveDate>,
    /// Restrict to these loans.
    pub ids: Option<Vec<LoanId>>,
    /// Created on or after this UTC day.
    pub created_from: Option<NaiveDate>,
    /// Created on or before this UTC day.
    pub created_to: Option<NaiveDate>,
}

impl LoanCriteria {
    /// Creates a new empty criteria.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a free-text search. Blank text is ignored.
    #[must_use]
    pub fn search(mut self, search: &str) -> Self {
        self.search = normalize_search(search);
        self
    }

    /// Filters by status.
    #[must_use]
    pub const fn status(mut self, status: LoanStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Keeps loans whose period lies inside `[from, to]`.
    ///
    /// With both bounds a loan must start on or after `from` and end on or
    /// before `to`; a single bound applies on its own.
    #[must_use]
    pub const fn period_within(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.start_from = from;
        self.end_to = to;
        self
    }

    /// Restricts to an explicit set of loans.
    #[must_use]
    pub fn ids(mut self, ids: Vec<LoanId>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Keeps loans created within `[from, to]` (inclusive UTC days).
    #[must_use]
    pub const fn created_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.created_from = from;
        self.created_to = to;
        self
    }

    /// Returns true if the criteria is empty (matches everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluates the criteria against a loan.
    #[must_use]
    pub fn matches(&self, loan: &LoanRecord) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = contains_ignore_case(&loan.name, &needle)
                || contains_ignore_case(&loan.phone, &needle)
                || loan
                    .referrer
                    .as_deref()
                    .is_some_and(|r| contains_ignore_case(r, &needle));
            if !hit {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != loan.status) {
            return false;
        }
        if let Some(from) = self.start_from {
            if !loan.loan_start_date.is_some_and(|d| d >= from) {
                return false;
            }
        }
        if let Some(to) = self.end_to {
            if !loan.loan_end_date.is_some_and(|d| d <= to) {
                return false;
            }
        }
        if let Some(ids) = &self.ids {
            if !ids.contains(&loan.id) {
                return false;
            }
        }
        let created = loan.created_at.date_naive();
        if self.created_from.is_some_and(|from| created < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| created > to) {
            return false;
        }
        true
    }
}

/// Filter for finance ledger queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryCriteria {
    /// Case-insensitive substring over title/name and description.
    pub search: Option<String>,
    /// Booked on or after this date.
    pub date_from: Option<NaiveDate>,
    /// Booked on or before this date.
    pub date_to: Option<NaiveDate>,
}

impl EntryCriteria {
    /// Creates a new empty criteria.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a free-text search. Blank text is ignored.
    #[must_use]
    pub fn search(mut self, search: &str) -> Self {
        self.search = normalize_search(search);
        self
    }

    /// Restricts to the inclusive date window.
    #[must_use]
    pub const fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Evaluates the criteria against an entry.
    #[must_use]
    pub fn matches<E: LedgerEntry>(&self, entry: &E) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !contains_ignore_case(entry.label(), &needle)
                && !contains_ignore_case(entry.description(), &needle)
            {
                return false;
            }
        }
        let date = entry.date();
        if self.date_from.is_some_and(|from| date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| date > to) {
            return false;
        }
        true
    }
}
