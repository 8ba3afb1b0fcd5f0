//! Core business logic for Lendbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Domain types, ledger rules, aggregates and the store contracts live here;
//! persistence is plugged in through the traits in [`loan::store`].
//!
//! # Modules
//!
//! - `loan` - Loan lifecycle: creation, installments, rollover, updates
//! - `profit` - Manual profit reconciliation against the profit ledger
//! - `finance` - Profit, expense, investment and reserve fund ledgers
//! - `query` - Search criteria and sort orders
//! - `summary` - Daily trends, period totals and the dashboard
//! - `report` - Tabular exports

pub mod finance;
pub mod loan;
pub mod profit;
pub mod query;
pub mod report;
pub mod summary;

#[cfg(test)]
mod testing;
