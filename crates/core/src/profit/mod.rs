//! Reconciliation between a loan's manual profit and the profit ledger.
//!
//! A loan with a positive manual profit owns exactly one profit entry whose
//! `loan_ref` points back at it. The entry is rewritten every time the loan's
//! manual profit is saved. It is removed when the manual profit is cleared
//! and together with the loan.

mod reconcile;

pub use reconcile::{
    ManualProfit, ResetSummary, display_label, manual_profit_description, manual_profit_title,
    reset_all_profits, upsert_manual_profit,
};
