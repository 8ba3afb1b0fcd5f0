//! Keeps the profit ledger entry linked to a loan in step with its manual
//! profit.

use chrono::{DateTime, Utc};
use lendbook_shared::types::{LoanId, ProfitId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::finance::ProfitEntry;
use crate::loan::{LoanRecord, LoanStore, ProfitLedger, StoreError};

/// The loan fields the profit entry is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualProfit<'a> {
    /// Owning loan.
    pub loan_id: LoanId,
    /// Borrower name.
    pub name: &'a str,
    /// Borrower phone.
    pub phone: &'a str,
    /// Declared profit.
    pub amount: Option<Decimal>,
    /// Timestamp whose day becomes the entry date.
    pub booked_at: DateTime<Utc>,
}

impl<'a> ManualProfit<'a> {
    /// Reads the manual profit of a loan, booked at `booked_at`.
    #[must_use]
    pub fn from_loan(loan: &'a LoanRecord, booked_at: DateTime<Utc>) -> Self {
        Self {
            loan_id: loan.id,
            name: &loan.name,
            phone: &loan.phone,
            amount: loan.manual_profit,
            booked_at,
        }
    }
}

/// First non-blank of name, phone and loan ID.
#[must_use]
pub fn display_label(name: &str, phone: &str, loan_id: LoanId) -> String {
    [name.trim(), phone.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .map_or_else(|| loan_id.to_string(), str::to_string)
}

/// Title of the profit entry linked to a loan.
#[must_use]
pub fn manual_profit_title(label: &str) -> String {
    format!("Manual Profit - {label}")
}

/// Description of the profit entry linked to a loan.
#[must_use]
pub fn manual_profit_description(loan_id: LoanId, phone: &str) -> String {
    let phone = phone.trim();
    let phone = if phone.is_empty() { "N/A" } else { phone };
    format!("Manual profit entered for loan {loan_id} ({phone})")
}

/// Creates or rewrites the profit entry linked to a loan.
///
/// Does nothing and returns `None` when the manual profit is absent or not
/// positive.
pub async fn upsert_manual_profit<P: ProfitLedger>(
    ledger: &P,
    profit: &ManualProfit<'_>,
    now: DateTime<Utc>,
) -> Result<Option<ProfitEntry>, StoreError> {
    let Some(amount) = profit.amount.filter(|a| *a > Decimal::ZERO) else {
        return Ok(None);
    };

    let title = manual_profit_title(&display_label(profit.name, profit.phone, profit.loan_id));
    let description = manual_profit_description(profit.loan_id, profit.phone);
    let date = profit.booked_at.date_naive();

    let entry = match ledger.find_by_loan_ref(profit.loan_id).await? {
        Some(existing) => ProfitEntry {
            title,
            amount,
            date,
            description,
            updated_at: now,
            ..existing
        },
        None => ProfitEntry {
            id: ProfitId::new(),
            title,
            amount,
            date,
            description,
            loan_ref: Some(profit.loan_id),
            created_at: now,
            updated_at: now,
        },
    };

    let saved = ledger.upsert(&entry).await?;
    info!(loan_id = %profit.loan_id, profit_id = %saved.id, amount = %saved.amount, "Manual profit reconciled");
    Ok(Some(saved))
}

/// Counts reported by [`reset_all_profits`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSummary {
    /// Profit entries removed.
    pub profits_deleted: u64,
    /// Loans whose manual profit was cleared.
    pub loans_cleared: u64,
}

/// Deletes every profit entry and clears the manual profit of every loan.
pub async fn reset_all_profits<S: LoanStore, P: ProfitLedger>(
    loans: &S,
    ledger: &P,
) -> Result<ResetSummary, StoreError> {
    let profits_deleted = ledger.delete_all().await?;
    let loans_cleared = loans.clear_manual_profits().await?;
    info!(profits_deleted, loans_cleared, "All profits reset");
    Ok(ResetSummary {
        profits_deleted,
        loans_cleared,
    })
}
