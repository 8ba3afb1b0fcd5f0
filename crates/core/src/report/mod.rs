//! Tabular projections of loans and ledgers for export.
//!
//! Tables are plain headers plus string rows; serializing them (CSV) is left
//! to the HTTP layer.

mod columns;
mod table;

pub use columns::{LoanColumn, parse_fields};
pub use table::{
    MISSING, ReportTable, combined_table, daily_table, entry_table, investment_table, loan_table,
};
