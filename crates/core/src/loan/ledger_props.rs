//! Property-based tests for the installment ledger rules.
//!
//! - Balance always equals `max(loan_amount - total_paid, 0)`
//! - Rejected installments leave the record untouched
//! - A zero balance means closed with nothing due
//! - Installment count matches the history within a cycle

use chrono::{TimeZone, Utc};
use lendbook_shared::types::LoanId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::ledger::{apply_installment, build_loan, derive_due_installments, remaining_balance};
use super::types::{LoanRecord, LoanStatus, NewLoan};

/// Strategy for positive amounts between 0.01 and 10,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn open_loan(loan_amount: Decimal, per_day: Decimal) -> LoanRecord {
    build_loan(
        &NewLoan {
            name: Some("Prop".into()),
            phone: Some("100".into()),
            loan_amount: Some(loan_amount),
            given_amount: Some(loan_amount),
            per_day_collection: Some(per_day),
            ..NewLoan::default()
        },
        LoanId::new(),
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn test_balance_tracks_payments(
        loan_amount in positive_amount(),
        per_day in positive_amount(),
        payments in prop::collection::vec(positive_amount(), 0..40),
    ) {
        let mut loan = open_loan(loan_amount, per_day);
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();

        for amount in payments {
            let before = loan.clone();
            match apply_installment(&mut loan, amount, at) {
                Ok(()) => {
                    prop_assert!(amount <= before.remaining_loan);
                    prop_assert_eq!(loan.total_paid_loan, before.total_paid_loan + amount);
                }
                Err(_) => {
                    prop_assert!(amount > before.remaining_loan);
                    prop_assert_eq!(&loan, &before);
                }
            }

            prop_assert_eq!(
                loan.remaining_loan,
                remaining_balance(loan.loan_amount, loan.total_paid_loan)
            );
            prop_assert!(loan.remaining_loan >= Decimal::ZERO);
            prop_assert_eq!(
                usize::try_from(loan.total_paid_installments).unwrap(),
                loan.installments.len()
            );
            if loan.remaining_loan.is_zero() {
                prop_assert_eq!(loan.status, LoanStatus::Closed);
                prop_assert_eq!(loan.total_due_installments, 0);
            } else {
                prop_assert_eq!(loan.status, LoanStatus::Open);
                prop_assert_eq!(
                    loan.total_due_installments,
                    derive_due_installments(loan.remaining_loan, loan.per_day_collection)
                );
            }
        }
    }

    #[test]
    fn test_paying_exact_balance_closes(
        loan_amount in positive_amount(),
        per_day in positive_amount(),
    ) {
        let mut loan = open_loan(loan_amount, per_day);
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();

        apply_installment(&mut loan, loan_amount, at).unwrap();

        prop_assert_eq!(loan.status, LoanStatus::Closed);
        prop_assert_eq!(loan.total_due_installments, 0);
        prop_assert!(apply_installment(&mut loan, Decimal::new(1, 2), at).is_err());
        prop_assert_eq!(loan.remaining_loan, Decimal::ZERO);
    }

    #[test]
    fn test_due_installments_cover_balance(
        remaining in positive_amount(),
        per_day in positive_amount(),
    ) {
        let due = Decimal::from(derive_due_installments(remaining, per_day));
        prop_assert!(due * per_day >= remaining);
        prop_assert!((due - Decimal::ONE) * per_day < remaining);
    }
}
