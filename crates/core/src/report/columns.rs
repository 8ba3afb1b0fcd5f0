//! Loan report columns.

use crate::loan::LoanRecord;

/// A selectable loan report column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoanColumn {
    /// Borrower name.
    Name,
    /// Phone.
    Phone,
    /// Principal owed.
    LoanAmount,
    /// Principal disbursed.
    GivenAmount,
    /// Daily collection.
    PerDayCollection,
    /// Term in days.
    DaysForLoan,
    /// Installments still due.
    TotalDueInstallments,
    /// Installments paid this cycle.
    TotalPaidInstallments,
    /// Amount repaid.
    TotalPaidLoan,
    /// Outstanding balance.
    RemainingLoan,
    /// Aadhaar number.
    Aadhaar,
    /// PAN.
    Pan,
    /// Referrer.
    Referrer,
    /// Open or closed.
    Status,
    /// New or renew.
    LoanType,
    /// Manual profit override.
    ManualProfit,
}

impl LoanColumn {
    /// Every column, in report order.
    pub const ALL: [Self; 16] = [
        Self::Name,
        Self::Phone,
        Self::LoanAmount,
        Self::GivenAmount,
        Self::PerDayCollection,
        Self::DaysForLoan,
        Self::TotalDueInstallments,
        Self::TotalPaidInstallments,
        Self::TotalPaidLoan,
        Self::RemainingLoan,
        Self::Aadhaar,
        Self::Pan,
        Self::Referrer,
        Self::Status,
        Self::LoanType,
        Self::ManualProfit,
    ];

    /// Column header.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Phone => "Phone",
            Self::LoanAmount => "Loan",
            Self::GivenAmount => "Given",
            Self::PerDayCollection => "Per Day",
            Self::DaysForLoan => "Days",
            Self::TotalDueInstallments => "Due Inst.",
            Self::TotalPaidInstallments => "Paid Inst.",
            Self::TotalPaidLoan => "Paid Loan",
            Self::RemainingLoan => "Remaining",
            Self::Aadhaar => "Aadhaar",
            Self::Pan => "PAN",
            Self::Referrer => "Reference",
            Self::Status => "Status",
            Self::LoanType => "Loan Type",
            Self::ManualProfit => "Manual Profit",
        }
    }

    /// Parses a field name. Accepts snake_case and camelCase, plus the
    /// legacy `adharCard`, `panCard` and `referenceBy` keys.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let key: String = value
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Some(match key.as_str() {
            "name" => Self::Name,
            "phone" => Self::Phone,
            "loanamount" => Self::LoanAmount,
            "givenamount" => Self::GivenAmount,
            "perdaycollection" => Self::PerDayCollection,
            "daysforloan" => Self::DaysForLoan,
            "totaldueinstallments" => Self::TotalDueInstallments,
            "totalpaidinstallments" => Self::TotalPaidInstallments,
            "totalpaidloan" => Self::TotalPaidLoan,
            "remainingloan" => Self::RemainingLoan,
            "aadhaar" | "adharcard" => Self::Aadhaar,
            "pan" | "pancard" => Self::Pan,
            "referrer" | "referenceby" => Self::Referrer,
            "status" => Self::Status,
            "loantype" => Self::LoanType,
            "manualprofit" => Self::ManualProfit,
            _ => return None,
        })
    }

    /// Cell value for `loan`, `None` when the field is unset.
    #[must_use]
    pub fn value(self, loan: &LoanRecord) -> Option<String> {
        match self {
            Self::Name => Some(loan.name.clone()),
            Self::Phone => Some(loan.phone.clone()),
            Self::LoanAmount => Some(loan.loan_amount.to_string()),
            Self::GivenAmount => Some(loan.given_amount.to_string()),
            Self::PerDayCollection => Some(loan.per_day_collection.to_string()),
            Self::DaysForLoan => loan.days_for_loan.map(|d| d.to_string()),
            Self::TotalDueInstallments => Some(loan.total_due_installments.to_string()),
            Self::TotalPaidInstallments => Some(loan.total_paid_installments.to_string()),
            Self::TotalPaidLoan => Some(loan.total_paid_loan.to_string()),
            Self::RemainingLoan => Some(loan.remaining_loan.to_string()),
            Self::Aadhaar => loan.aadhaar.clone(),
            Self::Pan => loan.pan.clone(),
            Self::Referrer => loan.referrer.clone(),
            Self::Status => Some(loan.status.to_string()),
            Self::LoanType => Some(loan.loan_type.as_str().to_string()),
            Self::ManualProfit => loan.manual_profit.map(|p| p.to_string()),
        }
    }
}

/// Parses a comma-separated `fields` parameter.
///
/// Absent, blank or `all` selects every column. Unknown names are skipped;
/// duplicates keep their first position.
#[must_use]
pub fn parse_fields(fields: Option<&str>) -> Vec<LoanColumn> {
    let Some(fields) = fields.map(str::trim).filter(|f| !f.is_empty()) else {
        return LoanColumn::ALL.to_vec();
    };
    if fields.eq_ignore_ascii_case("all") {
        return LoanColumn::ALL.to_vec();
    }
    let mut columns = Vec::new();
    for column in fields.split(',').filter_map(LoanColumn::parse) {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    columns
}
