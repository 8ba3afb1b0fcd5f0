//! Loan routes: lifecycle, listing, aggregates and exports.

use axum::{
    Router,
    extract::State,
    response::Response,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use lendbook_core::loan::{
    AmountInput, LoanHistory, LoanPatch, LoanRecord, LoanStatus, NewLoan, RolloverTerms,
    ledger::normalize_amount,
};
use lendbook_core::query::{LoanCriteria, LoanSort, LoanSortField};
use lendbook_core::report::{daily_table, loan_table, parse_fields};
use lendbook_core::summary::{
    DailyAmount, LoanProfitSummary, auto_profit_loans, daily_totals, loan_expense_trend,
    loan_profit_summary,
};
use lendbook_shared::AppError;
use lendbook_shared::types::{LoanId, PageResponse, SortDirection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::export::csv_attachment;
use crate::response::{ApiError, ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult};

/// Creates the loan routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/loans", post(create_loan))
        .route("/loans/search", post(search_loans))
        .route("/loans/rollover", post(rollover_loan))
        .route("/loans/profit", get(loan_profit))
        .route("/loans/profit/export", get(export_daily_profit))
        .route("/loans/expense", get(loan_expense))
        .route("/loans/expense/export", get(export_daily_expense))
        .route("/loans/export", get(export_loans))
        .route(
            "/loans/{id}",
            get(get_loan).patch(update_loan).delete(delete_loan),
        )
        .route("/loans/{id}/installments", post(apply_installment))
        .route("/loans/{id}/history", get(loan_history))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Loan listing filters, paging and sort.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoanSearchRequest {
    /// Substring of name, phone or referrer.
    pub search: Option<String>,
    /// "Open", "Closed" or "all".
    pub status: Option<String>,
    /// Earliest period start.
    pub start_date: Option<NaiveDate>,
    /// Latest period end.
    pub end_date: Option<NaiveDate>,
    /// 1-based page.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
    /// Sort column, e.g. `created_at` or `loanAmount`.
    pub sort_by: Option<String>,
    /// "asc" or "desc".
    pub sort_order: Option<SortDirection>,
}

impl LoanSearchRequest {
    fn criteria(&self) -> Result<LoanCriteria, ApiError> {
        let mut criteria = LoanCriteria::new();
        if let Some(search) = &self.search {
            criteria = criteria.search(search);
        }
        if let Some(status) = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
        {
            let status = LoanStatus::parse(status)
                .ok_or_else(|| AppError::Validation(format!("Invalid status: {status}")))?;
            criteria = criteria.status(status);
        }
        Ok(criteria.period_within(self.start_date, self.end_date))
    }

    fn sort(&self) -> LoanSort {
        let field = self
            .sort_by
            .as_deref()
            .and_then(LoanSortField::parse)
            .unwrap_or_default();
        LoanSort::new(field, self.sort_order.unwrap_or_default())
    }
}

/// Installment request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InstallmentRequest {
    /// Amount paid, as a number or numeric string.
    pub amount: Option<AmountInput>,
}

/// Loan report query.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoanExportQuery {
    /// Comma-separated column names, or "all".
    pub fields: Option<String>,
    /// Comma-separated loan IDs; all loans when absent.
    pub rows: Option<String>,
}

/// Creation-date window of an export.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DateRangeQuery {
    /// First day, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Last day, inclusive.
    pub date_to: Option<NaiveDate>,
}

/// Loan expense aggregate.
#[derive(Debug, Serialize)]
pub struct LoanExpenseSummary {
    /// Sum of disbursed principal.
    pub total_expense: Decimal,
    /// Loans counted.
    pub total_loans: u64,
    /// Disbursed principal per creation day.
    pub daily_trend: Vec<DailyAmount>,
}

fn parse_rows(rows: Option<&str>) -> Result<Option<Vec<LoanId>>, ApiError> {
    let Some(rows) = rows.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    rows.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| {
            r.parse::<LoanId>()
                .map_err(|_| ApiError::from(AppError::Validation(format!("Invalid loan id: {r}"))))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

// ============================================================================
// Handlers
// ============================================================================

async fn create_loan(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewLoan>,
) -> ApiResult<LoanRecord> {
    let loan = state.loan_service().create_loan(&input).await?;
    Ok(ApiResponse::created("Loan created successfully", loan))
}

async fn search_loans(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoanSearchRequest>,
) -> ApiResult<PageResponse<LoanRecord>> {
    let criteria = request.criteria()?;
    let page = state.page(request.page, request.per_page);
    let loans = state
        .loan_service()
        .list_loans(&criteria, request.sort(), page)
        .await?;
    Ok(ApiResponse::ok("Loans fetched successfully", loans))
}

async fn get_loan(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<LoanId>,
) -> ApiResult<LoanRecord> {
    let loan = state.loan_service().get_loan(id).await?;
    Ok(ApiResponse::ok("Loan fetched successfully", loan))
}

async fn update_loan(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<LoanId>,
    ApiJson(patch): ApiJson<LoanPatch>,
) -> ApiResult<LoanRecord> {
    let loan = state.loan_service().update_loan(id, &patch).await?;
    Ok(ApiResponse::ok("Loan updated successfully", loan))
}

async fn delete_loan(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<LoanId>,
) -> ApiResult<LoanId> {
    state.loan_service().delete_loan(id).await?;
    Ok(ApiResponse::ok("Loan deleted successfully", id))
}

async fn apply_installment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<LoanId>,
    ApiJson(request): ApiJson<InstallmentRequest>,
) -> ApiResult<LoanRecord> {
    let amount = normalize_amount(request.amount.as_ref(), "amount")?
        .ok_or_else(|| AppError::Validation("amount is required".into()))?;
    let loan = state.loan_service().apply_installment(id, amount).await?;
    Ok(ApiResponse::ok("Installment updated successfully", loan))
}

async fn loan_history(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<LoanId>,
) -> ApiResult<LoanHistory> {
    let history = state.loan_service().loan_history(id).await?;
    Ok(ApiResponse::ok("Loan history fetched successfully", history))
}

async fn rollover_loan(
    State(state): State<AppState>,
    ApiJson(terms): ApiJson<RolloverTerms>,
) -> ApiResult<LoanRecord> {
    let loan = state.loan_service().rollover_loan(&terms).await?;
    Ok(ApiResponse::ok("Loan renewed successfully", loan))
}

async fn loan_profit(State(state): State<AppState>) -> ApiResult<LoanProfitSummary> {
    let loans = state
        .loan_service()
        .all_loans(&LoanCriteria::new(), LoanSort::default())
        .await?;
    let summary = loan_profit_summary(&loans, Utc::now().date_naive());
    Ok(ApiResponse::ok("Loan profit fetched successfully", summary))
}

async fn loan_expense(State(state): State<AppState>) -> ApiResult<LoanExpenseSummary> {
    let loans = state
        .loan_service()
        .all_loans(&LoanCriteria::new(), LoanSort::default())
        .await?;
    let summary = LoanExpenseSummary {
        total_expense: loans.iter().map(|l| l.given_amount).sum(),
        total_loans: loans.len() as u64,
        daily_trend: loan_expense_trend(&loans),
    };
    Ok(ApiResponse::ok("Loan expense fetched successfully", summary))
}

async fn export_loans(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LoanExportQuery>,
) -> Result<Response, ApiError> {
    let columns = parse_fields(query.fields.as_deref());
    let mut criteria = LoanCriteria::new();
    if let Some(ids) = parse_rows(query.rows.as_deref())? {
        criteria = criteria.ids(ids);
    }
    let loans = state
        .loan_service()
        .all_loans(
            &criteria,
            LoanSort::new(LoanSortField::CreatedAt, SortDirection::Asc),
        )
        .await?;
    csv_attachment("loans.csv", &loan_table(&loans, &columns))
}

async fn export_daily_profit(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DateRangeQuery>,
) -> Result<Response, ApiError> {
    let criteria = LoanCriteria::new().created_between(query.date_from, query.date_to);
    let loans = state
        .loan_service()
        .all_loans(&criteria, LoanSort::default())
        .await?;
    let days = daily_totals(
        auto_profit_loans(&loans).map(|l| (l.created_at.date_naive(), l.auto_profit())),
    );
    csv_attachment("daily-profit.csv", &daily_table("Profit", &days))
}

async fn export_daily_expense(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DateRangeQuery>,
) -> Result<Response, ApiError> {
    let criteria = LoanCriteria::new().created_between(query.date_from, query.date_to);
    let loans = state
        .loan_service()
        .all_loans(&criteria, LoanSort::default())
        .await?;
    csv_attachment(
        "loan-expense.csv",
        &daily_table("Expense", &loan_expense_trend(&loans)),
    )
}
