//! Finance ledger entry types.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use lendbook_shared::types::{ExpenseId, InvestmentId, LoanId, ProfitId, ReserveFundId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Common view over the four finance ledgers.
pub trait LedgerEntry {
    /// Title or name of the entry.
    fn label(&self) -> &str;
    /// Booking date.
    fn date(&self) -> NaiveDate;
    /// Amount.
    fn amount(&self) -> Decimal;
    /// Free-text description.
    fn description(&self) -> &str;
    /// Created timestamp.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Which finance ledger an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    /// Profit entries.
    Profit,
    /// Expense entries.
    Expense,
    /// Investment entries.
    Investment,
    /// Reserve fund entries.
    ReserveFund,
}

impl LedgerKind {
    /// Human-readable singular name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Profit => "Profit",
            Self::Expense => "Expense",
            Self::Investment => "Investment",
            Self::ReserveFund => "Reserve fund",
        }
    }
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A profit ledger entry, optionally linked to a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitEntry {
    /// Entry ID.
    pub id: ProfitId,
    /// Title.
    pub title: String,
    /// Amount.
    pub amount: Decimal,
    /// Booking date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Loan whose manual profit this entry mirrors.
    pub loan_ref: Option<LoanId>,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated timestamp.
    pub updated_at: DateTime<Utc>,
}

/// An expense ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    /// Entry ID.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub name: String,
    /// Booking date.
    pub date: NaiveDate,
    /// Amount.
    pub amount: Decimal,
    /// Description.
    pub description: String,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Unit of an investment duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationType {
    /// Months.
    Month,
    /// Years.
    Year,
}

impl DurationType {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Month => "Month",
            Self::Year => "Year",
        }
    }

    /// Parses the stored representation (exact match).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Month" => Some(Self::Month),
            "Year" => Some(Self::Year),
            _ => None,
        }
    }
}

/// An investment ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentEntry {
    /// Entry ID.
    pub id: InvestmentId,
    /// Investment name.
    pub name: String,
    /// Booking date.
    pub date: NaiveDate,
    /// Amount.
    pub amount: Decimal,
    /// Duration unit.
    pub duration_type: DurationType,
    /// Duration length, always positive.
    pub duration_value: i32,
    /// Description.
    pub description: String,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated timestamp.
    pub updated_at: DateTime<Utc>,
}

impl InvestmentEntry {
    /// Duration as shown in reports, e.g. "6 Months".
    #[must_use]
    pub fn duration_label(&self) -> String {
        let plural = if self.duration_value > 1 { "s" } else { "" };
        format!(
            "{} {}{plural}",
            self.duration_value,
            self.duration_type.as_str()
        )
    }
}

/// A reserve fund entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveFundEntry {
    /// Entry ID.
    pub id: ReserveFundId,
    /// Title.
    pub title: String,
    /// Booking date.
    pub date: NaiveDate,
    /// Amount.
    pub amount: Decimal,
    /// Description.
    pub description: String,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated timestamp.
    pub updated_at: DateTime<Utc>,
}

macro_rules! ledger_entry {
    ($ty:ty, $label:ident) => {
        impl LedgerEntry for $ty {
            fn label(&self) -> &str {
                &self.$label
            }

            fn date(&self) -> NaiveDate {
                self.date
            }

            fn amount(&self) -> Decimal {
                self.amount
            }

            fn description(&self) -> &str {
                &self.description
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
        }
    };
}

ledger_entry!(ProfitEntry, title);
ledger_entry!(ExpenseEntry, name);
ledger_entry!(InvestmentEntry, name);
ledger_entry!(ReserveFundEntry, title);

/// Input for a profit or reserve fund entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewTitledEntry {
    /// Title (required).
    pub title: Option<String>,
    /// Amount (required, > 0).
    pub amount: Option<Decimal>,
    /// Booking date (required).
    pub date: Option<NaiveDate>,
    /// Description.
    pub description: Option<String>,
}

/// Input for an expense entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewExpense {
    /// Name (required).
    pub name: Option<String>,
    /// Amount (required, > 0).
    pub amount: Option<Decimal>,
    /// Booking date (required).
    pub date: Option<NaiveDate>,
    /// Description.
    pub description: Option<String>,
}

/// Input for an investment entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewInvestment {
    /// Name (required).
    pub name: Option<String>,
    /// Amount (required, > 0).
    pub amount: Option<Decimal>,
    /// Booking date (required).
    pub date: Option<NaiveDate>,
    /// "Month" or "Year" (required).
    pub duration_type: Option<String>,
    /// Duration length (required, > 0).
    pub duration_value: Option<i32>,
    /// Description.
    pub description: Option<String>,
}

/// Per-ledger totals of the combined finance view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceTotals {
    /// Sum of profit entries.
    pub total_profit: Decimal,
    /// Sum of expense entries.
    pub total_expense: Decimal,
    /// Sum of investment entries.
    pub total_investment: Decimal,
    /// Sum of reserve fund entries.
    pub total_reserve: Decimal,
}

/// All four ledgers over one date window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedFinance {
    /// Profit entries.
    pub profits: Vec<ProfitEntry>,
    /// Expense entries.
    pub expenses: Vec<ExpenseEntry>,
    /// Investment entries.
    pub investments: Vec<InvestmentEntry>,
    /// Reserve fund entries.
    pub reserves: Vec<ReserveFundEntry>,
    /// Per-ledger totals.
    pub totals: FinanceTotals,
}

impl CombinedFinance {
    /// Assembles the view and computes its totals.
    #[must_use]
    pub fn new(
        profits: Vec<ProfitEntry>,
        expenses: Vec<ExpenseEntry>,
        investments: Vec<InvestmentEntry>,
        reserves: Vec<ReserveFundEntry>,
    ) -> Self {
        let totals = FinanceTotals {
            total_profit: sum_amounts(&profits),
            total_expense: sum_amounts(&expenses),
            total_investment: sum_amounts(&investments),
            total_reserve: sum_amounts(&reserves),
        };
        Self {
            profits,
            expenses,
            investments,
            reserves,
            totals,
        }
    }
}

/// Sum of the amounts of `entries`.
pub fn sum_amounts<E: LedgerEntry>(entries: &[E]) -> Decimal {
    entries.iter().map(LedgerEntry::amount).sum()
}
