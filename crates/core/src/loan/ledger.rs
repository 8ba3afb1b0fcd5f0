//! Pure installment ledger rules.
//!
//! Every function here works on an in-memory `LoanRecord` and never touches a
//! store, so the lifecycle service can re-run them against a fresh snapshot
//! after a version conflict.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use lendbook_shared::types::LoanId;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::error::LoanError;
use super::types::{
    AmountInput, Installment, LoanPatch, LoanRecord, LoanStatus, LoanType, NewLoan, RolloverTerms,
};

/// Outcome of a patch or rollover for the linked profit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualProfitChange {
    /// The manual profit was not touched.
    Unchanged,
    /// A new positive value was set.
    Set,
    /// The value was removed or made non-positive.
    Cleared,
}

/// Number of installments needed to repay `remaining`.
///
/// `ceil(remaining / per_day)`, or 0 when nothing is owed or the daily
/// collection is not positive.
#[must_use]
pub fn derive_due_installments(remaining: Decimal, per_day: Decimal) -> i32 {
    if remaining <= Decimal::ZERO || per_day <= Decimal::ZERO {
        return 0;
    }
    (remaining / per_day).ceil().to_i32().unwrap_or(i32::MAX)
}

/// `max(loan_amount - total_paid, 0)`.
#[must_use]
pub fn remaining_balance(loan_amount: Decimal, total_paid: Decimal) -> Decimal {
    (loan_amount - total_paid).max(Decimal::ZERO)
}

/// Normalizes an optional loan type, defaulting to `New`.
#[must_use]
pub fn normalize_loan_type(input: Option<&str>) -> LoanType {
    input.map_or(LoanType::New, LoanType::from_input)
}

/// Coerces a loosely typed amount.
///
/// Absent input and empty text map to `None`; text that is not a number is a
/// validation error.
pub fn normalize_amount(input: Option<&AmountInput>, field: &str) -> Result<Option<Decimal>, LoanError> {
    match input {
        None => Ok(None),
        Some(AmountInput::Number(n)) => Ok(Some(*n)),
        Some(AmountInput::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            Decimal::from_str(text)
                .map(Some)
                .map_err(|_| LoanError::validation(format!("{field} must be a number")))
        }
    }
}

/// Coerces the manual profit field.
pub fn normalize_manual_profit(input: Option<&AmountInput>) -> Result<Option<Decimal>, LoanError> {
    normalize_amount(input, "manual_profit")
}

fn required_text(value: Option<&str>, field: &str) -> Result<String, LoanError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(LoanError::validation(format!("{field} is required"))),
    }
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn non_negative(value: Decimal, field: &str) -> Result<Decimal, LoanError> {
    if value < Decimal::ZERO {
        return Err(LoanError::validation(format!("{field} cannot be negative")));
    }
    Ok(value)
}

fn required_amount(value: Option<Decimal>, field: &str) -> Result<Decimal, LoanError> {
    let value = value.ok_or_else(|| LoanError::validation(format!("{field} is required")))?;
    non_negative(value, field)
}

fn positive_per_day(value: Decimal) -> Result<Decimal, LoanError> {
    if value <= Decimal::ZERO {
        return Err(LoanError::validation(
            "per_day_collection must be greater than zero",
        ));
    }
    Ok(value)
}

fn check_balance(remaining: Decimal, loan_amount: Decimal) -> Result<(), LoanError> {
    non_negative(remaining, "remaining_loan")?;
    if remaining > loan_amount {
        return Err(LoanError::validation(
            "remaining_loan cannot exceed loan_amount",
        ));
    }
    Ok(())
}

/// Re-derives status and due count from the balance.
///
/// A zero balance always closes the loan. Asking for `Closed` while money is
/// still owed is rejected.
fn settle(loan: &mut LoanRecord, requested: Option<LoanStatus>) -> Result<(), LoanError> {
    if loan.remaining_loan.is_zero() {
        loan.status = LoanStatus::Closed;
    } else if requested == Some(LoanStatus::Closed) {
        return Err(LoanError::validation(
            "A loan with an outstanding balance cannot be closed",
        ));
    } else {
        loan.status = LoanStatus::Open;
    }
    loan.total_due_installments = if loan.status == LoanStatus::Closed {
        0
    } else {
        derive_due_installments(loan.remaining_loan, loan.per_day_collection)
    };
    Ok(())
}

/// Builds a new loan record from validated input.
pub fn build_loan(input: &NewLoan, id: LoanId, now: DateTime<Utc>) -> Result<LoanRecord, LoanError> {
    let name = required_text(input.name.as_deref(), "name")?;
    let phone = required_text(input.phone.as_deref(), "phone")?;
    let loan_amount = required_amount(input.loan_amount, "loan_amount")?;
    let given_amount = required_amount(input.given_amount, "given_amount")?;
    let per_day_collection = positive_per_day(
        input
            .per_day_collection
            .ok_or_else(|| LoanError::validation("per_day_collection is required"))?,
    )?;
    let total_paid_loan = non_negative(input.total_paid_loan.unwrap_or_default(), "total_paid_loan")?;
    let remaining_loan = normalize_amount(input.remaining_loan.as_ref(), "remaining_loan")?
        .unwrap_or_else(|| remaining_balance(loan_amount, total_paid_loan));
    check_balance(remaining_loan, loan_amount)?;

    let mut loan = LoanRecord {
        id,
        name,
        phone,
        aadhaar: optional_text(input.aadhaar.as_deref()),
        pan: optional_text(input.pan.as_deref()),
        referrer: optional_text(input.referrer.as_deref()),
        loan_amount,
        given_amount,
        per_day_collection,
        days_for_loan: input.days_for_loan,
        total_paid_loan,
        remaining_loan,
        total_paid_installments: 0,
        total_due_installments: 0,
        status: LoanStatus::Open,
        loan_start_date: input.loan_start_date,
        loan_end_date: input.loan_end_date,
        loan_type: normalize_loan_type(input.loan_type.as_deref()),
        manual_profit: normalize_manual_profit(input.manual_profit.as_ref())?,
        installments: Vec::new(),
        cycle: 1,
        version: 0,
        created_at: now,
        updated_at: now,
    };
    settle(&mut loan, None)?;
    Ok(loan)
}

/// Applies an installment to the loan.
///
/// The record is left untouched when the amount is rejected.
pub fn apply_installment(
    loan: &mut LoanRecord,
    amount: Decimal,
    at: DateTime<Utc>,
) -> Result<(), LoanError> {
    if amount <= Decimal::ZERO {
        return Err(LoanError::validation(
            "Installment amount must be greater than zero",
        ));
    }
    if amount > loan.remaining_loan {
        return Err(LoanError::AmountExceedsRemaining {
            amount,
            remaining: loan.remaining_loan,
        });
    }

    loan.installments.push(Installment {
        amount,
        date: at,
        remaining_after_installment: (loan.remaining_loan - amount).max(Decimal::ZERO),
        cycle: loan.cycle,
    });
    loan.total_paid_loan += amount;
    loan.remaining_loan = remaining_balance(loan.loan_amount, loan.total_paid_loan);
    loan.total_paid_installments += 1;
    loan.updated_at = at;
    settle(loan, None)
}

/// Merges a patch onto the loan.
pub fn apply_patch(
    loan: &mut LoanRecord,
    patch: &LoanPatch,
    now: DateTime<Utc>,
) -> Result<ManualProfitChange, LoanError> {
    if let Some(name) = patch.name.as_deref() {
        loan.name = required_text(Some(name), "name")?;
    }
    if let Some(phone) = patch.phone.as_deref() {
        loan.phone = required_text(Some(phone), "phone")?;
    }
    if let Some(aadhaar) = &patch.aadhaar {
        loan.aadhaar = optional_text(aadhaar.as_deref());
    }
    if let Some(pan) = &patch.pan {
        loan.pan = optional_text(pan.as_deref());
    }
    if let Some(referrer) = &patch.referrer {
        loan.referrer = optional_text(referrer.as_deref());
    }
    if let Some(given) = patch.given_amount {
        loan.given_amount = non_negative(given, "given_amount")?;
    }
    if let Some(per_day) = patch.per_day_collection {
        loan.per_day_collection = positive_per_day(per_day)?;
    }
    if let Some(days) = patch.days_for_loan {
        loan.days_for_loan = days;
    }
    if let Some(start) = patch.loan_start_date {
        loan.loan_start_date = start;
    }
    if let Some(end) = patch.loan_end_date {
        loan.loan_end_date = end;
    }
    if let Some(loan_type) = patch.loan_type.as_deref() {
        loan.loan_type = LoanType::from_input(loan_type);
    }

    let mut balance_changed = false;
    if let Some(amount) = patch.loan_amount {
        let amount = non_negative(amount, "loan_amount")?;
        balance_changed |= amount != loan.loan_amount;
        loan.loan_amount = amount;
    }
    if let Some(paid) = patch.total_paid_loan {
        let paid = non_negative(paid, "total_paid_loan")?;
        if paid < loan.total_paid_loan {
            return Err(LoanError::validation(format!(
                "total_paid_loan cannot decrease below {}",
                loan.total_paid_loan
            )));
        }
        balance_changed |= paid != loan.total_paid_loan;
        loan.total_paid_loan = paid;
    }
    if let Some(remaining) = patch.remaining_loan {
        let derived = remaining_balance(loan.loan_amount, loan.total_paid_loan);
        if remaining != derived {
            return Err(LoanError::validation(format!(
                "remaining_loan must equal loan_amount minus total_paid_loan ({derived})"
            )));
        }
        balance_changed = true;
    }
    if balance_changed {
        loan.remaining_loan = remaining_balance(loan.loan_amount, loan.total_paid_loan);
    }
    check_balance(loan.remaining_loan, loan.loan_amount)?;
    settle(loan, patch.status)?;

    let change = match &patch.manual_profit {
        None => ManualProfitChange::Unchanged,
        Some(input) => {
            loan.manual_profit = normalize_manual_profit(input.as_ref())?;
            if loan.has_manual_profit() {
                ManualProfitChange::Set
            } else {
                ManualProfitChange::Cleared
            }
        }
    };

    loan.updated_at = now;
    Ok(change)
}

/// Starts a new loan cycle on an existing borrower record.
///
/// Terms fall back to the existing ones, running totals reset, and the
/// installment history is kept.
pub fn apply_rollover(
    loan: &mut LoanRecord,
    terms: &RolloverTerms,
    now: DateTime<Utc>,
) -> Result<ManualProfitChange, LoanError> {
    let loan_amount = non_negative(terms.loan_amount.unwrap_or(loan.loan_amount), "loan_amount")?;
    let given_amount = non_negative(
        terms.given_amount.unwrap_or(loan.given_amount),
        "given_amount",
    )?;
    let per_day_collection =
        positive_per_day(terms.per_day_collection.unwrap_or(loan.per_day_collection))?;
    let total_paid_loan = non_negative(terms.total_paid_loan.unwrap_or_default(), "total_paid_loan")?;
    let remaining_loan = terms
        .remaining_loan
        .unwrap_or_else(|| remaining_balance(loan_amount, total_paid_loan));
    check_balance(remaining_loan, loan_amount)?;
    let manual_profit = normalize_manual_profit(terms.manual_profit.as_ref())?;

    loan.loan_amount = loan_amount;
    loan.given_amount = given_amount;
    loan.per_day_collection = per_day_collection;
    loan.days_for_loan = terms.days_for_loan.or(loan.days_for_loan);
    loan.loan_start_date = Some(terms.loan_start_date.unwrap_or_else(|| now.date_naive()));
    loan.loan_end_date = terms.loan_end_date;
    loan.total_paid_loan = total_paid_loan;
    loan.remaining_loan = remaining_loan;
    loan.total_paid_installments = 0;
    let change = match manual_profit {
        None => ManualProfitChange::Unchanged,
        Some(profit) => {
            loan.manual_profit = Some(profit);
            if loan.has_manual_profit() {
                ManualProfitChange::Set
            } else {
                ManualProfitChange::Cleared
            }
        }
    };
    if let Some(loan_type) = terms.loan_type.as_deref() {
        loan.loan_type = LoanType::from_input(loan_type);
    }
    loan.cycle += 1;
    loan.updated_at = now;

    settle(loan, terms.status)?;
    if loan.status == LoanStatus::Open {
        if let Some(due) = terms.total_due_installments {
            loan.total_due_installments = due.max(0);
        }
    }
    Ok(change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap()
    }

    fn new_loan(loan: Decimal, given: Decimal, per_day: Decimal) -> NewLoan {
        NewLoan {
            name: Some("Asha".into()),
            phone: Some("9990001111".into()),
            loan_amount: Some(loan),
            given_amount: Some(given),
            per_day_collection: Some(per_day),
            ..NewLoan::default()
        }
    }

    fn sample() -> LoanRecord {
        build_loan(&new_loan(dec!(10000), dec!(9000), dec!(500)), LoanId::new(), now()).unwrap()
    }

    #[rstest]
    #[case(dec!(10000), dec!(500), 20)]
    #[case(dec!(9400), dec!(500), 19)]
    #[case(dec!(1), dec!(500), 1)]
    #[case(dec!(0), dec!(500), 0)]
    #[case(dec!(100), dec!(0), 0)]
    #[case(dec!(1000.50), dec!(100.25), 10)]
    fn test_derive_due_installments(
        #[case] remaining: Decimal,
        #[case] per_day: Decimal,
        #[case] expected: i32,
    ) {
        assert_eq!(derive_due_installments(remaining, per_day), expected);
    }

    #[test]
    fn test_build_loan_defaults() {
        let loan = sample();
        assert_eq!(loan.remaining_loan, dec!(10000));
        assert_eq!(loan.total_paid_loan, dec!(0));
        assert_eq!(loan.total_paid_installments, 0);
        assert_eq!(loan.total_due_installments, 20);
        assert_eq!(loan.status, LoanStatus::Open);
        assert_eq!(loan.loan_type, LoanType::New);
        assert_eq!(loan.manual_profit, None);
        assert_eq!(loan.cycle, 1);
    }

    #[test]
    fn test_build_loan_zero_balance_is_closed() {
        let mut input = new_loan(dec!(10000), dec!(9000), dec!(500));
        input.remaining_loan = Some(AmountInput::Number(dec!(0)));
        let loan = build_loan(&input, LoanId::new(), now()).unwrap();
        assert_eq!(loan.status, LoanStatus::Closed);
        assert_eq!(loan.total_due_installments, 0);
    }

    #[test]
    fn test_build_loan_empty_remaining_uses_principal() {
        let mut input = new_loan(dec!(8000), dec!(7000), dec!(400));
        input.remaining_loan = Some(AmountInput::Text(String::new()));
        let loan = build_loan(&input, LoanId::new(), now()).unwrap();
        assert_eq!(loan.remaining_loan, dec!(8000));
    }

    #[rstest]
    #[case::missing_name(NewLoan { name: None, ..new_loan(dec!(1), dec!(1), dec!(1)) })]
    #[case::blank_phone(NewLoan { phone: Some("  ".into()), ..new_loan(dec!(1), dec!(1), dec!(1)) })]
    #[case::missing_amount(NewLoan { loan_amount: None, ..new_loan(dec!(1), dec!(1), dec!(1)) })]
    #[case::negative_given(new_loan(dec!(100), dec!(-1), dec!(1)))]
    #[case::zero_per_day(new_loan(dec!(100), dec!(90), dec!(0)))]
    #[case::remaining_above_principal(NewLoan {
        remaining_loan: Some(AmountInput::Number(dec!(200))),
        ..new_loan(dec!(100), dec!(90), dec!(10))
    })]
    #[case::bad_profit(NewLoan {
        manual_profit: Some(AmountInput::Text("lots".into())),
        ..new_loan(dec!(100), dec!(90), dec!(10))
    })]
    fn test_build_loan_rejects(#[case] input: NewLoan) {
        let err = build_loan(&input, LoanId::new(), now()).unwrap_err();
        assert!(matches!(err, LoanError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn test_normalize_manual_profit() {
        assert_eq!(normalize_manual_profit(None).unwrap(), None);
        assert_eq!(
            normalize_manual_profit(Some(&AmountInput::Text(String::new()))).unwrap(),
            None
        );
        assert_eq!(
            normalize_manual_profit(Some(&AmountInput::Text(" 2000 ".into()))).unwrap(),
            Some(dec!(2000))
        );
        assert_eq!(
            normalize_manual_profit(Some(&AmountInput::Number(dec!(150.5)))).unwrap(),
            Some(dec!(150.5))
        );
        assert!(normalize_manual_profit(Some(&AmountInput::Text("abc".into()))).is_err());
    }

    #[test]
    fn test_installment_updates_running_state() {
        let mut loan = sample();
        apply_installment(&mut loan, dec!(600), now()).unwrap();

        assert_eq!(loan.remaining_loan, dec!(9400));
        assert_eq!(loan.total_paid_loan, dec!(600));
        assert_eq!(loan.total_paid_installments, 1);
        assert_eq!(loan.total_due_installments, 19);
        assert_eq!(loan.installments.len(), 1);
        assert_eq!(loan.installments[0].remaining_after_installment, dec!(9400));
        assert_eq!(loan.installments[0].cycle, 1);
    }

    #[test]
    fn test_installment_exceeding_balance_leaves_loan_unchanged() {
        let mut loan = sample();
        apply_installment(&mut loan, dec!(600), now()).unwrap();
        let before = loan.clone();

        let err = apply_installment(&mut loan, dec!(15000), now()).unwrap_err();
        assert!(matches!(
            err,
            LoanError::AmountExceedsRemaining { remaining, .. } if remaining == dec!(9400)
        ));
        assert_eq!(loan, before);
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-5))]
    fn test_installment_must_be_positive(#[case] amount: Decimal) {
        let mut loan = sample();
        let err = apply_installment(&mut loan, amount, now()).unwrap_err();
        assert!(matches!(err, LoanError::Validation(_)));
        assert!(loan.installments.is_empty());
    }

    #[test]
    fn test_final_installment_closes_loan() {
        let mut loan = sample();
        apply_installment(&mut loan, dec!(10000), now()).unwrap();

        assert_eq!(loan.remaining_loan, dec!(0));
        assert_eq!(loan.status, LoanStatus::Closed);
        assert_eq!(loan.total_due_installments, 0);
        assert!(apply_installment(&mut loan, dec!(1), now()).is_err());
    }

    #[test]
    fn test_patch_loan_amount_recomputes_balance() {
        let mut loan = sample();
        apply_installment(&mut loan, dec!(1000), now()).unwrap();

        let patch = LoanPatch {
            loan_amount: Some(dec!(12000)),
            ..LoanPatch::default()
        };
        let change = apply_patch(&mut loan, &patch, now()).unwrap();

        assert_eq!(change, ManualProfitChange::Unchanged);
        assert_eq!(loan.remaining_loan, dec!(11000));
        assert_eq!(loan.total_due_installments, 22);
    }

    #[test]
    fn test_patch_remaining_must_match_payments() {
        let mut loan = sample();
        let patch = LoanPatch {
            remaining_loan: Some(dec!(5000)),
            ..LoanPatch::default()
        };
        assert!(matches!(
            apply_patch(&mut loan, &patch, now()),
            Err(LoanError::Validation(_))
        ));

        let mut loan = sample();
        let patch = LoanPatch {
            loan_amount: Some(dec!(12000)),
            total_paid_loan: Some(dec!(7000)),
            remaining_loan: Some(dec!(5000)),
            ..LoanPatch::default()
        };
        apply_patch(&mut loan, &patch, now()).unwrap();
        assert_eq!(loan.remaining_loan, dec!(5000));
        assert_eq!(loan.total_due_installments, 10);

        apply_installment(&mut loan, dec!(100), now()).unwrap();
        assert_eq!(loan.remaining_loan, dec!(4900));
        assert_eq!(loan.installments[0].remaining_after_installment, dec!(4900));
    }

    #[test]
    fn test_patch_total_paid_cannot_decrease() {
        let mut loan = sample();
        apply_installment(&mut loan, dec!(1000), now()).unwrap();

        let patch = LoanPatch {
            total_paid_loan: Some(dec!(400)),
            ..LoanPatch::default()
        };
        let err = apply_patch(&mut loan, &patch, now()).unwrap_err();
        assert!(matches!(err, LoanError::Validation(_)), "got {err:?}");

        let patch = LoanPatch {
            total_paid_loan: Some(dec!(1500)),
            ..LoanPatch::default()
        };
        apply_patch(&mut loan, &patch, now()).unwrap();
        assert_eq!(loan.remaining_loan, dec!(8500));
    }

    #[test]
    fn test_patch_cannot_close_with_balance() {
        let mut loan = sample();
        let patch = LoanPatch {
            status: Some(LoanStatus::Closed),
            ..LoanPatch::default()
        };
        assert!(matches!(
            apply_patch(&mut loan, &patch, now()),
            Err(LoanError::Validation(_))
        ));
    }

    #[test]
    fn test_patch_manual_profit_set_and_clear() {
        let mut loan = sample();
        let set = LoanPatch {
            manual_profit: Some(Some(AmountInput::Number(dec!(2000)))),
            ..LoanPatch::default()
        };
        assert_eq!(
            apply_patch(&mut loan, &set, now()).unwrap(),
            ManualProfitChange::Set
        );
        assert_eq!(loan.manual_profit, Some(dec!(2000)));

        let clear = LoanPatch {
            manual_profit: Some(None),
            ..LoanPatch::default()
        };
        assert_eq!(
            apply_patch(&mut loan, &clear, now()).unwrap(),
            ManualProfitChange::Cleared
        );
        assert_eq!(loan.manual_profit, None);
    }

    #[test]
    fn test_patch_clears_optional_text() {
        let mut loan = sample();
        loan.pan = Some("ABCDE1234F".into());
        let patch = LoanPatch {
            pan: Some(None),
            referrer: Some(Some(" Meena ".into())),
            ..LoanPatch::default()
        };
        apply_patch(&mut loan, &patch, now()).unwrap();
        assert_eq!(loan.pan, None);
        assert_eq!(loan.referrer.as_deref(), Some("Meena"));
    }

    #[test]
    fn test_rollover_preserves_history_and_resets_state() {
        let mut loan = sample();
        apply_installment(&mut loan, dec!(600), now()).unwrap();
        apply_installment(&mut loan, dec!(400), now()).unwrap();

        let terms = RolloverTerms {
            phone: "9990001111".into(),
            loan_amount: Some(dec!(5000)),
            ..RolloverTerms::default()
        };
        apply_rollover(&mut loan, &terms, now()).unwrap();

        assert_eq!(loan.installments.len(), 2);
        assert_eq!(loan.remaining_loan, dec!(5000));
        assert_eq!(loan.total_paid_loan, dec!(0));
        assert_eq!(loan.total_paid_installments, 0);
        assert_eq!(loan.total_due_installments, 10);
        assert_eq!(loan.status, LoanStatus::Open);
        assert_eq!(loan.cycle, 2);
        assert_eq!(loan.given_amount, dec!(9000));
        assert_eq!(loan.loan_start_date, Some(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()));
        assert_eq!(loan.loan_end_date, None);
        assert_eq!(loan.current_cycle_installments().count(), 0);
    }

    #[test]
    fn test_rollover_keeps_existing_profit_and_type() {
        let mut loan = sample();
        loan.manual_profit = Some(dec!(700));
        loan.loan_type = LoanType::Renew;

        let terms = RolloverTerms {
            phone: loan.phone.clone(),
            manual_profit: Some(AmountInput::Text(String::new())),
            total_due_installments: Some(30),
            ..RolloverTerms::default()
        };
        let change = apply_rollover(&mut loan, &terms, now()).unwrap();

        assert_eq!(change, ManualProfitChange::Unchanged);
        assert_eq!(loan.manual_profit, Some(dec!(700)));
        assert_eq!(loan.loan_type, LoanType::Renew);
        assert_eq!(loan.total_due_installments, 30);
    }

    #[rstest]
    #[case::zero(AmountInput::Number(dec!(0)))]
    #[case::negative(AmountInput::Text("-50".into()))]
    fn test_rollover_non_positive_profit_clears(#[case] profit: AmountInput) {
        let mut loan = sample();
        loan.manual_profit = Some(dec!(700));

        let terms = RolloverTerms {
            phone: loan.phone.clone(),
            manual_profit: Some(profit),
            ..RolloverTerms::default()
        };
        let change = apply_rollover(&mut loan, &terms, now()).unwrap();

        assert_eq!(change, ManualProfitChange::Cleared);
        assert!(!loan.has_manual_profit());
    }
}
