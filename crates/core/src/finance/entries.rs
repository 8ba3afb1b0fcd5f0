//! Validation and construction of finance ledger entries.

use chrono::{DateTime, NaiveDate, Utc};
use lendbook_shared::types::{ExpenseId, InvestmentId, ProfitId, ReserveFundId};
use rust_decimal::Decimal;

use super::error::FinanceError;
use super::types::{
    DurationType, ExpenseEntry, InvestmentEntry, NewExpense, NewInvestment, NewTitledEntry,
    ProfitEntry, ReserveFundEntry,
};

/// Validated fields shared by every ledger entry.
struct Common {
    label: String,
    amount: Decimal,
    date: NaiveDate,
    description: String,
}

fn common(
    label: Option<&str>,
    amount: Option<Decimal>,
    date: Option<NaiveDate>,
    description: Option<&str>,
    required: &str,
) -> Result<Common, FinanceError> {
    let label = label.map(str::trim).filter(|l| !l.is_empty());
    let amount = amount.filter(|a| !a.is_zero());
    let (Some(label), Some(amount), Some(date)) = (label, amount, date) else {
        return Err(FinanceError::validation(format!("{required} are required")));
    };
    if amount < Decimal::ZERO {
        return Err(FinanceError::validation("amount cannot be negative"));
    }
    Ok(Common {
        label: label.to_string(),
        amount,
        date,
        description: description.map(str::trim).unwrap_or_default().to_string(),
    })
}

/// Builds a standalone profit entry.
pub fn build_profit(input: &NewTitledEntry, now: DateTime<Utc>) -> Result<ProfitEntry, FinanceError> {
    let c = common(
        input.title.as_deref(),
        input.amount,
        input.date,
        input.description.as_deref(),
        "title, amount and date",
    )?;
    Ok(ProfitEntry {
        id: ProfitId::new(),
        title: c.label,
        amount: c.amount,
        date: c.date,
        description: c.description,
        loan_ref: None,
        created_at: now,
        updated_at: now,
    })
}

/// Builds an expense entry.
pub fn build_expense(input: &NewExpense, now: DateTime<Utc>) -> Result<ExpenseEntry, FinanceError> {
    let c = common(
        input.name.as_deref(),
        input.amount,
        input.date,
        input.description.as_deref(),
        "name, amount and date",
    )?;
    Ok(ExpenseEntry {
        id: ExpenseId::new(),
        name: c.label,
        date: c.date,
        amount: c.amount,
        description: c.description,
        created_at: now,
        updated_at: now,
    })
}

/// Builds an investment entry.
pub fn build_investment(
    input: &NewInvestment,
    now: DateTime<Utc>,
) -> Result<InvestmentEntry, FinanceError> {
    const REQUIRED: &str = "name, date, amount, duration_type and duration_value";

    let c = common(
        input.name.as_deref(),
        input.amount,
        input.date,
        input.description.as_deref(),
        REQUIRED,
    )?;
    let duration_type = input
        .duration_type
        .as_deref()
        .ok_or_else(|| FinanceError::validation(format!("{REQUIRED} are required")))?;
    let duration_type = DurationType::parse(duration_type)
        .ok_or_else(|| FinanceError::validation("duration_type must be 'Month' or 'Year'"))?;
    let duration_value = match input.duration_value {
        Some(v) if v > 0 => v,
        Some(_) => {
            return Err(FinanceError::validation(
                "duration_value must be greater than zero",
            ));
        }
        None => return Err(FinanceError::validation(format!("{REQUIRED} are required"))),
    };

    Ok(InvestmentEntry {
        id: InvestmentId::new(),
        name: c.label,
        date: c.date,
        amount: c.amount,
        duration_type,
        duration_value,
        description: c.description,
        created_at: now,
        updated_at: now,
    })
}

/// Builds a reserve fund entry.
pub fn build_reserve_fund(
    input: &NewTitledEntry,
    now: DateTime<Utc>,
) -> Result<ReserveFundEntry, FinanceError> {
    let c = common(
        input.title.as_deref(),
        input.amount,
        input.date,
        input.description.as_deref(),
        "title, amount and date",
    )?;
    Ok(ReserveFundEntry {
        id: ReserveFundId::new(),
        title: c.label,
        date: c.date,
        amount: c.amount,
        description: c.description,
        created_at: now,
        updated_at: now,
    })
}
