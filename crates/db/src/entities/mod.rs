//! `SeaORM` entity definitions.

pub mod expenses;
pub mod investments;
pub mod loan_installments;
pub mod loans;
pub mod profits;
pub mod reserve_funds;
