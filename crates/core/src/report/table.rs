//! Report tables.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::columns::LoanColumn;
use crate::finance::{CombinedFinance, InvestmentEntry, LedgerEntry, LedgerKind};
use crate::loan::LoanRecord;
use crate::summary::DailyAmount;

/// Placeholder for an unset cell.
pub const MISSING: &str = "-";

/// Headers plus string rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Rows, each as long as `headers`.
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    fn with_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Number of data rows, including any total row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Projects loans onto the selected columns, numbered from 1.
#[must_use]
pub fn loan_table(loans: &[LoanRecord], columns: &[LoanColumn]) -> ReportTable {
    let mut table = ReportTable::with_headers(
        std::iter::once("#").chain(columns.iter().map(|c| c.header())),
    );
    for (i, loan) in loans.iter().enumerate() {
        let mut row = Vec::with_capacity(columns.len() + 1);
        row.push((i + 1).to_string());
        row.extend(
            columns
                .iter()
                .map(|c| c.value(loan).unwrap_or_else(|| MISSING.to_string())),
        );
        table.rows.push(row);
    }
    table
}

/// One row per day plus a total row.
#[must_use]
pub fn daily_table(amount_header: &str, days: &[DailyAmount]) -> ReportTable {
    let mut table = ReportTable::with_headers(["S.No", "Date", amount_header]);
    let mut total = Decimal::ZERO;
    for (i, day) in days.iter().enumerate() {
        total += day.amount;
        table.rows.push(vec![
            (i + 1).to_string(),
            day.date.to_string(),
            day.amount.to_string(),
        ]);
    }
    table
        .rows
        .push(vec![String::new(), "Total".into(), total.to_string()]);
    table
}

/// Ledger entries with a total row. `label_header` names the label column.
#[must_use]
pub fn entry_table<E: LedgerEntry>(label_header: &str, entries: &[E]) -> ReportTable {
    let mut table =
        ReportTable::with_headers(["S.No", "Date", label_header, "Amount", "Description"]);
    let mut total = Decimal::ZERO;
    for (i, entry) in entries.iter().enumerate() {
        total += entry.amount();
        table.rows.push(vec![
            (i + 1).to_string(),
            entry.date().to_string(),
            entry.label().to_string(),
            entry.amount().to_string(),
            entry.description().to_string(),
        ]);
    }
    table.rows.push(vec![
        String::new(),
        String::new(),
        "Total".into(),
        total.to_string(),
        String::new(),
    ]);
    table
}

/// Investment entries with their duration and a total row.
#[must_use]
pub fn investment_table(entries: &[InvestmentEntry]) -> ReportTable {
    let mut table = ReportTable::with_headers([
        "S.No",
        "Date",
        "Name",
        "Amount",
        "Duration",
        "Description",
    ]);
    let mut total = Decimal::ZERO;
    for (i, entry) in entries.iter().enumerate() {
        total += entry.amount;
        table.rows.push(vec![
            (i + 1).to_string(),
            entry.date.to_string(),
            entry.name.clone(),
            entry.amount.to_string(),
            entry.duration_label(),
            entry.description.clone(),
        ]);
    }
    table.rows.push(vec![
        String::new(),
        String::new(),
        "Total".into(),
        total.to_string(),
        String::new(),
        String::new(),
    ]);
    table
}

/// All four ledgers in one sheet, followed by one total row per ledger.
#[must_use]
pub fn combined_table(finance: &CombinedFinance) -> ReportTable {
    let mut table = ReportTable::with_headers([
        "S.No",
        "Ledger",
        "Date",
        "Label",
        "Amount",
        "Description",
    ]);
    push_ledger(&mut table, LedgerKind::Profit, &finance.profits);
    push_ledger(&mut table, LedgerKind::Expense, &finance.expenses);
    push_ledger(&mut table, LedgerKind::Investment, &finance.investments);
    push_ledger(&mut table, LedgerKind::ReserveFund, &finance.reserves);

    let totals = &finance.totals;
    for (kind, total) in [
        (LedgerKind::Profit, totals.total_profit),
        (LedgerKind::Expense, totals.total_expense),
        (LedgerKind::Investment, totals.total_investment),
        (LedgerKind::ReserveFund, totals.total_reserve),
    ] {
        table.rows.push(vec![
            String::new(),
            kind.display_name().into(),
            String::new(),
            "Total".into(),
            total.to_string(),
            String::new(),
        ]);
    }
    table
}

fn push_ledger<E: LedgerEntry>(table: &mut ReportTable, kind: LedgerKind, entries: &[E]) {
    for entry in entries {
        let n = table.rows.len() + 1;
        table.rows.push(vec![
            n.to_string(),
            kind.display_name().into(),
            entry.date().to_string(),
            entry.label().to_string(),
            entry.amount().to_string(),
            entry.description().to_string(),
        ]);
    }
}
