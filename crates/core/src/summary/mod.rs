//! In-memory aggregates over loan and ledger snapshots.

pub mod dashboard;
pub mod trend;

pub use dashboard::{
    CustomerMetrics, DashboardDay, DashboardInput, DashboardMetrics, FinanceMetrics,
    build_dashboard,
};
pub use trend::{
    DailyAmount, EntrySummary, LoanProfitSummary, auto_profit_loans, daily_totals,
    in_previous_month, loan_expense_trend, loan_profit_summary, summarize_entries,
};
