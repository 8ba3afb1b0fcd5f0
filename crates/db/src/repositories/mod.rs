//! Repository implementations for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! The loan and profit repositories implement the store traits of the core crate.

pub mod ledger;
pub mod loan;
pub mod profit;

pub use ledger::{
    ExpenseRepository, InvestmentRepository, LedgerRepository, ProfitRepository,
    ReserveFundRepository,
};
pub use loan::LoanRepository;

use lendbook_core::loan::StoreError;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition, DbErr};
use tracing::error;

/// Maps a database error to a store error, logging it under `operation`.
pub(crate) fn store_error(operation: &'static str) -> impl Fn(DbErr) -> StoreError {
    move |err| {
        error!(operation, error = %err, "Database operation failed");
        StoreError::Database(err.to_string())
    }
}

/// Case-insensitive substring match over any of `columns`.
pub(crate) fn contains_any<C: ColumnTrait>(columns: &[C], needle: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    columns.iter().fold(Condition::any(), |condition, column| {
        condition.add(
            Expr::expr(Func::lower(Expr::col(*column)))
                .like(LikeExpr::new(pattern.clone()).escape('\\')),
        )
    })
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
