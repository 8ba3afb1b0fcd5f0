//! Loan ledger domain types.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use lendbook_shared::types::LoanId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Loan lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    /// Balance outstanding.
    #[default]
    Open,
    /// Fully repaid.
    Closed,
}

impl LoanStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }

    /// Parses a stored status, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("open") {
            Some(Self::Open)
        } else if value.eq_ignore_ascii_case("closed") {
            Some(Self::Closed)
        } else {
            None
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a loan is a first loan or a renewal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    /// First loan for the borrower.
    #[default]
    New,
    /// Renewal of an earlier loan.
    Renew,
}

impl LoanType {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Renew => "renew",
        }
    }

    /// `Renew` only on a case-insensitive match of "renew", `New` otherwise.
    #[must_use]
    pub fn from_input(value: &str) -> Self {
        if value.to_lowercase() == "renew" {
            Self::Renew
        } else {
            Self::New
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loosely typed amount as sent by form clients.
///
/// Accepts JSON numbers as well as strings. An empty string means "no value".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// A numeric value (or a numeric string).
    Number(Decimal),
    /// Free text that still has to be parsed.
    Text(String),
}

impl From<Decimal> for AmountInput {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

/// A single installment in a loan's append-only history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// Amount paid.
    pub amount: Decimal,
    /// When the installment was recorded.
    pub date: DateTime<Utc>,
    /// Balance left after this installment.
    pub remaining_after_installment: Decimal,
    /// Loan cycle the installment belongs to.
    pub cycle: i32,
}

/// The installment ledger entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    /// Loan ID.
    pub id: LoanId,
    /// Borrower name.
    pub name: String,
    /// Borrower phone, the natural key for rollovers.
    pub phone: String,
    /// Aadhaar number.
    pub aadhaar: Option<String>,
    /// PAN number.
    pub pan: Option<String>,
    /// Who referred the borrower.
    pub referrer: Option<String>,
    /// Principal owed.
    pub loan_amount: Decimal,
    /// Principal disbursed.
    pub given_amount: Decimal,
    /// Expected daily installment.
    pub per_day_collection: Decimal,
    /// Planned duration in days.
    pub days_for_loan: Option<i32>,
    /// Total collected in the current cycle.
    pub total_paid_loan: Decimal,
    /// Outstanding balance.
    pub remaining_loan: Decimal,
    /// Installments collected in the current cycle.
    pub total_paid_installments: i32,
    /// Installments still expected.
    pub total_due_installments: i32,
    /// Lifecycle status.
    pub status: LoanStatus,
    /// First day of the loan period.
    pub loan_start_date: Option<NaiveDate>,
    /// Last day of the loan period.
    pub loan_end_date: Option<NaiveDate>,
    /// New or renewal.
    pub loan_type: LoanType,
    /// Declared profit, overriding the computed one.
    pub manual_profit: Option<Decimal>,
    /// Installment history across all cycles.
    pub installments: Vec<Installment>,
    /// Current loan cycle, starting at 1.
    pub cycle: i32,
    /// Optimistic concurrency version.
    pub version: i64,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated timestamp.
    pub updated_at: DateTime<Utc>,
}

impl LoanRecord {
    /// Installments paid in the current cycle.
    pub fn current_cycle_installments(&self) -> impl Iterator<Item = &Installment> {
        self.installments.iter().filter(|i| i.cycle == self.cycle)
    }

    /// Returns true when a positive manual profit is declared.
    #[must_use]
    pub fn has_manual_profit(&self) -> bool {
        self.manual_profit.is_some_and(|p| p > Decimal::ZERO)
    }

    /// Profit computed from the loan terms.
    #[must_use]
    pub fn auto_profit(&self) -> Decimal {
        self.loan_amount - self.given_amount
    }
}

/// Input for creating a loan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewLoan {
    /// Borrower name (required).
    pub name: Option<String>,
    /// Borrower phone (required).
    pub phone: Option<String>,
    /// Aadhaar number.
    pub aadhaar: Option<String>,
    /// PAN number.
    pub pan: Option<String>,
    /// Referrer.
    pub referrer: Option<String>,
    /// Principal owed (required).
    pub loan_amount: Option<Decimal>,
    /// Principal disbursed (required).
    pub given_amount: Option<Decimal>,
    /// Expected daily installment (required, > 0).
    pub per_day_collection: Option<Decimal>,
    /// Planned duration in days.
    pub days_for_loan: Option<i32>,
    /// Already collected amount, defaults to 0.
    pub total_paid_loan: Option<Decimal>,
    /// Opening balance, defaults to the unpaid principal.
    pub remaining_loan: Option<AmountInput>,
    /// First day of the loan period.
    pub loan_start_date: Option<NaiveDate>,
    /// Last day of the loan period.
    pub loan_end_date: Option<NaiveDate>,
    /// "new" or "renew".
    pub loan_type: Option<String>,
    /// Declared profit.
    pub manual_profit: Option<AmountInput>,
}

/// Partial update of a loan.
///
/// Absent fields are left untouched. Nullable columns use a double option so
/// that an explicit `null` clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanPatch {
    /// Borrower name.
    pub name: Option<String>,
    /// Borrower phone.
    pub phone: Option<String>,
    /// Aadhaar number.
    #[serde(with = "::serde_with::rust::double_option")]
    pub aadhaar: Option<Option<String>>,
    /// PAN number.
    #[serde(with = "::serde_with::rust::double_option")]
    pub pan: Option<Option<String>>,
    /// Referrer.
    #[serde(with = "::serde_with::rust::double_option")]
    pub referrer: Option<Option<String>>,
    /// Principal owed.
    pub loan_amount: Option<Decimal>,
    /// Principal disbursed.
    pub given_amount: Option<Decimal>,
    /// Expected daily installment.
    pub per_day_collection: Option<Decimal>,
    /// Planned duration in days.
    #[serde(with = "::serde_with::rust::double_option")]
    pub days_for_loan: Option<Option<i32>>,
    /// Collected amount.
    pub total_paid_loan: Option<Decimal>,
    /// Outstanding balance.
    pub remaining_loan: Option<Decimal>,
    /// Requested status.
    pub status: Option<LoanStatus>,
    /// First day of the loan period.
    #[serde(with = "::serde_with::rust::double_option")]
    pub loan_start_date: Option<Option<NaiveDate>>,
    /// Last day of the loan period.
    #[serde(with = "::serde_with::rust::double_option")]
    pub loan_end_date: Option<Option<NaiveDate>>,
    /// "new" or "renew".
    pub loan_type: Option<String>,
    /// Declared profit; `null` or "" clears it.
    #[serde(with = "::serde_with::rust::double_option")]
    pub manual_profit: Option<Option<AmountInput>>,
}

/// New terms for rolling an existing borrower into a fresh loan cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RolloverTerms {
    /// Phone of the existing borrower (required).
    pub phone: String,
    /// Principal owed.
    pub loan_amount: Option<Decimal>,
    /// Principal disbursed.
    pub given_amount: Option<Decimal>,
    /// Expected daily installment.
    pub per_day_collection: Option<Decimal>,
    /// Planned duration in days.
    pub days_for_loan: Option<i32>,
    /// First day of the new period, defaults to today.
    pub loan_start_date: Option<NaiveDate>,
    /// Last day of the new period.
    pub loan_end_date: Option<NaiveDate>,
    /// Opening balance, defaults to the unpaid principal.
    pub remaining_loan: Option<Decimal>,
    /// Already collected amount, defaults to 0.
    pub total_paid_loan: Option<Decimal>,
    /// Installments still expected, derived when absent.
    pub total_due_installments: Option<i32>,
    /// Status, defaults to `Open`.
    pub status: Option<LoanStatus>,
    /// Declared profit, defaults to the existing one.
    pub manual_profit: Option<AmountInput>,
    /// "new" or "renew", defaults to the existing one.
    pub loan_type: Option<String>,
}

/// One row of a loan's payment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// When the installment was recorded.
    pub date: DateTime<Utc>,
    /// Amount paid.
    pub amount_paid: Decimal,
    /// Balance left after the installment.
    pub remaining_after_installment: Decimal,
    /// Loan cycle.
    pub cycle: i32,
}

/// Borrower summary plus installment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanHistory {
    /// Loan ID.
    pub id: LoanId,
    /// Borrower name.
    pub name: String,
    /// Borrower phone.
    pub phone: String,
    /// Principal owed.
    pub total_loan: Decimal,
    /// Outstanding balance.
    pub remaining_loan: Decimal,
    /// First day of the loan period.
    pub loan_start_date: Option<NaiveDate>,
    /// Last day of the loan period.
    pub loan_end_date: Option<NaiveDate>,
    /// Collected in the current cycle.
    pub total_paid_loan: Decimal,
    /// Installments, oldest first.
    pub history: Vec<HistoryItem>,
}

impl From<&LoanRecord> for LoanHistory {
    fn from(loan: &LoanRecord) -> Self {
        Self {
            id: loan.id,
            name: loan.name.clone(),
            phone: loan.phone.clone(),
            total_loan: loan.loan_amount,
            remaining_loan: loan.remaining_loan,
            loan_start_date: loan.loan_start_date,
            loan_end_date: loan.loan_end_date,
            total_paid_loan: loan.total_paid_loan,
            history: loan
                .installments
                .iter()
                .map(|i| HistoryItem {
                    date: i.date,
                    amount_paid: i.amount,
                    remaining_after_installment: i.remaining_after_installment,
                    cycle: i.cycle,
                })
                .collect(),
        }
    }
}
