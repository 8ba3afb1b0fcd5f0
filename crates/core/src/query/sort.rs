//! Sort specifications for listings.

use std::cmp::Ordering;

use lendbook_shared::types::SortDirection;
use serde::{Deserialize, Serialize};

use crate::finance::LedgerEntry;
use crate::loan::LoanRecord;

/// Loan column to sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanSortField {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Last update time.
    UpdatedAt,
    /// Borrower name.
    Name,
    /// Borrower phone.
    Phone,
    /// Principal owed.
    LoanAmount,
    /// Principal disbursed.
    GivenAmount,
    /// Outstanding balance.
    RemainingLoan,
    /// Period start.
    LoanStartDate,
    /// Period end.
    LoanEndDate,
    /// Status.
    Status,
}

impl LoanSortField {
    /// Parses a field name in snake_case or camelCase. Unknown names yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let key: String = value
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        let field = match key.as_str() {
            "createdat" => Self::CreatedAt,
            "updatedat" => Self::UpdatedAt,
            "name" => Self::Name,
            "phone" => Self::Phone,
            "loanamount" => Self::LoanAmount,
            "givenamount" => Self::GivenAmount,
            "remainingloan" => Self::RemainingLoan,
            "loanstartdate" => Self::LoanStartDate,
            "loanenddate" => Self::LoanEndDate,
            "status" => Self::Status,
            _ => return None,
        };
        Some(field)
    }
}

/// Sort specification for loans. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSort {
    /// Column.
    pub field: LoanSortField,
    /// Direction.
    pub direction: SortDirection,
}

impl LoanSort {
    /// Creates a sort specification.
    #[must_use]
    pub const fn new(field: LoanSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Compares two loans under this specification.
    #[must_use]
    pub fn compare(&self, a: &LoanRecord, b: &LoanRecord) -> Ordering {
        let ordering = match self.field {
            LoanSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            LoanSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            LoanSortField::Name => a.name.cmp(&b.name),
            LoanSortField::Phone => a.phone.cmp(&b.phone),
            LoanSortField::LoanAmount => a.loan_amount.cmp(&b.loan_amount),
            LoanSortField::GivenAmount => a.given_amount.cmp(&b.given_amount),
            LoanSortField::RemainingLoan => a.remaining_loan.cmp(&b.remaining_loan),
            LoanSortField::LoanStartDate => a.loan_start_date.cmp(&b.loan_start_date),
            LoanSortField::LoanEndDate => a.loan_end_date.cmp(&b.loan_end_date),
            LoanSortField::Status => a.status.as_str().cmp(b.status.as_str()),
        };
        apply_direction(ordering, self.direction)
    }

    /// Sorts loans in place.
    pub fn sort(&self, loans: &mut [LoanRecord]) {
        loans.sort_by(|a, b| self.compare(a, b));
    }
}

/// Ledger column to sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySortField {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Booking date.
    Date,
    /// Amount.
    Amount,
    /// Title or name.
    Label,
}

impl EntrySortField {
    /// Parses a field name. `title` and `name` both map to `Label`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let key: String = value
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "createdat" => Some(Self::CreatedAt),
            "date" => Some(Self::Date),
            "amount" => Some(Self::Amount),
            "title" | "name" | "label" => Some(Self::Label),
            _ => None,
        }
    }
}

/// Sort specification for ledger entries. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySort {
    /// Column.
    pub field: EntrySortField,
    /// Direction.
    pub direction: SortDirection,
}

impl EntrySort {
    /// Creates a sort specification.
    #[must_use]
    pub const fn new(field: EntrySortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Compares two entries under this specification.
    #[must_use]
    pub fn compare<E: LedgerEntry>(&self, a: &E, b: &E) -> Ordering {
        let ordering = match self.field {
            EntrySortField::CreatedAt => a.created_at().cmp(&b.created_at()),
            EntrySortField::Date => a.date().cmp(&b.date()),
            EntrySortField::Amount => a.amount().cmp(&b.amount()),
            EntrySortField::Label => a.label().cmp(b.label()),
        };
        apply_direction(ordering, self.direction)
    }
}

fn apply_direction(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}
