//! Dashboard aggregate.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::trend::auto_profit_loans;
use crate::finance::{
    ExpenseEntry, InvestmentEntry, LedgerEntry, ProfitEntry, ReserveFundEntry, sum_amounts,
};
use crate::loan::LoanRecord;

/// Customer and loan book metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerMetrics {
    /// Distinct borrowers by trimmed, case-insensitive name.
    pub total_customers: u64,
    /// Number of loans.
    pub total_loans: u64,
    /// Sum of principal owed.
    pub total_loan_amount: Decimal,
    /// Sum of principal disbursed.
    pub total_given_amount: Decimal,
    /// Sum of outstanding balances.
    pub total_remaining_loan: Decimal,
}

/// Ledger totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceMetrics {
    /// Manual plus computed profit.
    pub total_profit: Decimal,
    /// Sum of the profit ledger.
    pub manual_profit: Decimal,
    /// Computed profit of loans without a manual profit.
    pub loan_profit: Decimal,
    /// Sum of expenses.
    pub total_expense: Decimal,
    /// Sum of investments.
    pub total_investment: Decimal,
    /// Sum of reserve funds.
    pub total_reserve_fund: Decimal,
}

/// One day of the merged trend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardDay {
    /// UTC day.
    pub date: NaiveDate,
    /// Profit booked.
    pub profit: Decimal,
    /// Expenses booked.
    pub expense: Decimal,
    /// Investments booked.
    pub investment: Decimal,
    /// Reserve funds booked.
    pub reserve_fund: Decimal,
}

/// Dashboard metrics response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Customer metrics.
    pub customers: CustomerMetrics,
    /// Finance metrics.
    pub finance: FinanceMetrics,
    /// Per-day trend, oldest first.
    pub daily_trend: Vec<DashboardDay>,
}

/// Everything the dashboard is computed from.
#[derive(Debug, Clone, Copy)]
pub struct DashboardInput<'a> {
    /// All loans.
    pub loans: &'a [LoanRecord],
    /// All profit entries.
    pub profits: &'a [ProfitEntry],
    /// All expenses.
    pub expenses: &'a [ExpenseEntry],
    /// All investments.
    pub investments: &'a [InvestmentEntry],
    /// All reserve funds.
    pub reserves: &'a [ReserveFundEntry],
}

fn bucket(days: &mut BTreeMap<NaiveDate, DashboardDay>, date: NaiveDate) -> &mut DashboardDay {
    days.entry(date).or_insert_with(|| DashboardDay {
        date,
        ..DashboardDay::default()
    })
}

/// Builds the dashboard aggregate.
#[must_use]
pub fn build_dashboard(input: &DashboardInput<'_>) -> DashboardMetrics {
    let loans = input.loans;
    let customers: HashSet<String> = loans.iter().map(|l| l.name.trim().to_lowercase()).collect();

    let manual_profit = sum_amounts(input.profits);
    let loan_profit: Decimal = auto_profit_loans(loans).map(LoanRecord::auto_profit).sum();

    let mut days: BTreeMap<NaiveDate, DashboardDay> = BTreeMap::new();
    for p in input.profits {
        bucket(&mut days, p.date()).profit += p.amount();
    }
    for l in auto_profit_loans(loans) {
        bucket(&mut days, l.created_at.date_naive()).profit += l.auto_profit();
    }
    for e in input.expenses {
        bucket(&mut days, e.date()).expense += e.amount();
    }
    for i in input.investments {
        bucket(&mut days, i.date()).investment += i.amount();
    }
    for r in input.reserves {
        bucket(&mut days, r.date()).reserve_fund += r.amount();
    }

    DashboardMetrics {
        customers: CustomerMetrics {
            total_customers: customers.len() as u64,
            total_loans: loans.len() as u64,
            total_loan_amount: loans.iter().map(|l| l.loan_amount).sum(),
            total_given_amount: loans.iter().map(|l| l.given_amount).sum(),
            total_remaining_loan: loans.iter().map(|l| l.remaining_loan).sum(),
        },
        finance: FinanceMetrics {
            total_profit: manual_profit + loan_profit,
            manual_profit,
            loan_profit,
            total_expense: sum_amounts(input.expenses),
            total_investment: sum_amounts(input.investments),
            total_reserve_fund: sum_amounts(input.reserves),
        },
        daily_trend: days.into_values().collect(),
    }
}
