//! Daily trends and period totals.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::finance::LedgerEntry;
use crate::loan::LoanRecord;

/// Amount booked on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAmount {
    /// UTC day.
    pub date: NaiveDate,
    /// Sum for the day.
    pub amount: Decimal,
}

/// Buckets `(day, amount)` pairs per day, oldest first.
pub fn daily_totals<I>(items: I) -> Vec<DailyAmount>
where
    I: IntoIterator<Item = (NaiveDate, Decimal)>,
{
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for (date, amount) in items {
        *days.entry(date).or_default() += amount;
    }
    days.into_iter()
        .map(|(date, amount)| DailyAmount { date, amount })
        .collect()
}

/// Returns true if `date` falls in the calendar month before `today`'s.
#[must_use]
pub fn in_previous_month(date: NaiveDate, today: NaiveDate) -> bool {
    let (year, month) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    date.year() == year && date.month() == month
}

/// Computed loan profit aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanProfitSummary {
    /// Sum of `loan_amount - given_amount`.
    pub total_profit: Decimal,
    /// Same, for loans created in the previous calendar month.
    pub last_month_profit: Decimal,
    /// Loans counted.
    pub total_loans: u64,
    /// Profit per creation day.
    pub daily_trend: Vec<DailyAmount>,
}

/// Loans whose profit is computed from their terms.
///
/// Loans with a positive manual profit are skipped; their profit is carried
/// by the linked profit entry.
pub fn auto_profit_loans(loans: &[LoanRecord]) -> impl Iterator<Item = &LoanRecord> {
    loans.iter().filter(|l| !l.has_manual_profit())
}

/// Aggregates computed profit by creation day.
#[must_use]
pub fn loan_profit_summary(loans: &[LoanRecord], today: NaiveDate) -> LoanProfitSummary {
    let mut total_profit = Decimal::ZERO;
    let mut last_month_profit = Decimal::ZERO;
    let mut total_loans = 0;
    let mut points = Vec::new();

    for loan in auto_profit_loans(loans) {
        let day = loan.created_at.date_naive();
        let profit = loan.auto_profit();
        total_profit += profit;
        total_loans += 1;
        if in_previous_month(day, today) {
            last_month_profit += profit;
        }
        points.push((day, profit));
    }

    LoanProfitSummary {
        total_profit,
        last_month_profit,
        total_loans,
        daily_trend: daily_totals(points),
    }
}

/// Disbursed principal per creation day.
#[must_use]
pub fn loan_expense_trend(loans: &[LoanRecord]) -> Vec<DailyAmount> {
    daily_totals(
        loans
            .iter()
            .map(|l| (l.created_at.date_naive(), l.given_amount)),
    )
}

/// Summary of one finance ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    /// Sum of all entries.
    pub total_amount: Decimal,
    /// Sum of entries booked in the previous calendar month.
    pub last_month_amount: Decimal,
    /// Number of entries.
    pub total_count: u64,
    /// Amount per booking day.
    pub daily_trend: Vec<DailyAmount>,
}

/// Summarizes ledger entries relative to `today`.
#[must_use]
pub fn summarize_entries<E: LedgerEntry>(entries: &[E], today: NaiveDate) -> EntrySummary {
    let total_amount = entries.iter().map(LedgerEntry::amount).sum();
    let last_month_amount = entries
        .iter()
        .filter(|e| in_previous_month(e.date(), today))
        .map(LedgerEntry::amount)
        .sum();
    EntrySummary {
        total_amount,
        last_month_amount,
        total_count: entries.len() as u64,
        daily_trend: daily_totals(entries.iter().map(|e| (e.date(), e.amount()))),
    }
}
