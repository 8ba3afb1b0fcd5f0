//! Standalone finance ledgers: profits, expenses, investments and reserve funds.

pub mod entries;
pub mod error;
pub mod types;

pub use entries::{build_expense, build_investment, build_profit, build_reserve_fund};
pub use error::FinanceError;
pub use types::{
    CombinedFinance, DurationType, ExpenseEntry, FinanceTotals, InvestmentEntry, LedgerEntry,
    LedgerKind, NewExpense, NewInvestment, NewTitledEntry, ProfitEntry, ReserveFundEntry,
    sum_amounts,
};
