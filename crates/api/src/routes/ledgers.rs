//! Finance ledger routes.
//!
//! The four ledgers share one set of handlers, instantiated per repository
//! through [`LedgerResource`].

use axum::{
    Router,
    extract::State,
    response::Response,
    routing::{MethodRouter, delete, get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use lendbook_core::finance::{
    ExpenseEntry, FinanceError, InvestmentEntry, NewExpense, NewInvestment,
    NewTitledEntry, ProfitEntry, ReserveFundEntry, build_expense, build_investment, build_profit,
    build_reserve_fund, sum_amounts,
};
use lendbook_core::profit::ResetSummary;
use lendbook_core::query::{EntryCriteria, EntrySort, EntrySortField};
use lendbook_core::report::{ReportTable, entry_table, investment_table};
use lendbook_core::summary::{EntrySummary, summarize_entries};
use lendbook_db::{
    ExpenseRepository, InvestmentRepository, LedgerRepository, ProfitRepository,
    ReserveFundRepository,
};
use lendbook_shared::AppError;
use lendbook_shared::types::{PageMeta, SortDirection};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::export::csv_attachment;
use crate::response::{ApiError, ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult};

/// A ledger repository exposed over HTTP.
pub trait LedgerResource: LedgerRepository + Sized + 'static {
    /// Request body for a new entry.
    type Input: DeserializeOwned + Send + 'static;
    /// Path segment under `/api/v1`.
    const PATH: &'static str;

    /// Repository over `db`.
    fn open(db: DatabaseConnection) -> Self;

    /// Validates `input` into a new entry.
    fn build(input: &Self::Input, now: DateTime<Utc>) -> Result<Self::Entry, FinanceError>;

    /// Export table for `entries`.
    fn table(entries: &[Self::Entry]) -> ReportTable;

    /// Refuses to delete entries owned by another record.
    fn check_delete(_entry: &Self::Entry) -> Result<(), AppError> {
        Ok(())
    }
}

impl LedgerResource for ProfitRepository {
    type Input = NewTitledEntry;
    const PATH: &'static str = "profits";

    fn open(db: DatabaseConnection) -> Self {
        Self::new(db)
    }

    fn build(input: &NewTitledEntry, now: DateTime<Utc>) -> Result<ProfitEntry, FinanceError> {
        build_profit(input, now)
    }

    fn table(entries: &[ProfitEntry]) -> ReportTable {
        entry_table("Title", entries)
    }

    fn check_delete(entry: &ProfitEntry) -> Result<(), AppError> {
        match entry.loan_ref {
            Some(loan_id) => Err(AppError::Conflict(format!(
                "Profit entry is linked to loan {loan_id}; clear the loan's manual profit instead"
            ))),
            None => Ok(()),
        }
    }
}

impl LedgerResource for ExpenseRepository {
    type Input = NewExpense;
    const PATH: &'static str = "expenses";

    fn open(db: DatabaseConnection) -> Self {
        Self::new(db)
    }

    fn build(input: &NewExpense, now: DateTime<Utc>) -> Result<ExpenseEntry, FinanceError> {
        build_expense(input, now)
    }

    fn table(entries: &[ExpenseEntry]) -> ReportTable {
        entry_table("Name", entries)
    }
}

impl LedgerResource for InvestmentRepository {
    type Input = NewInvestment;
    const PATH: &'static str = "investments";

    fn open(db: DatabaseConnection) -> Self {
        Self::new(db)
    }

    fn build(input: &NewInvestment, now: DateTime<Utc>) -> Result<InvestmentEntry, FinanceError> {
        build_investment(input, now)
    }

    fn table(entries: &[InvestmentEntry]) -> ReportTable {
        investment_table(entries)
    }
}

impl LedgerResource for ReserveFundRepository {
    type Input = NewTitledEntry;
    const PATH: &'static str = "reserve-funds";

    fn open(db: DatabaseConnection) -> Self {
        Self::new(db)
    }

    fn build(input: &NewTitledEntry, now: DateTime<Utc>) -> Result<ReserveFundEntry, FinanceError> {
        build_reserve_fund(input, now)
    }

    fn table(entries: &[ReserveFundEntry]) -> ReportTable {
        entry_table("Title", entries)
    }
}

/// Creates the routes of all four ledgers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(ledger_routes::<ProfitRepository>(delete(reset_profits)))
        .merge(ledger_routes::<ExpenseRepository>(MethodRouter::new()))
        .merge(ledger_routes::<InvestmentRepository>(MethodRouter::new()))
        .merge(ledger_routes::<ReserveFundRepository>(MethodRouter::new()))
}

/// Routes of one ledger. `root` carries extra methods for the collection path.
fn ledger_routes<R: LedgerResource>(root: MethodRouter<AppState>) -> Router<AppState> {
    let base = format!("/{}", R::PATH);
    Router::new()
        .route(&base, root.post(create_entry::<R>))
        .route(&format!("{base}/search"), post(search_entries::<R>))
        .route(&format!("{base}/summary"), get(entry_summary::<R>))
        .route(&format!("{base}/export"), get(export_entries::<R>))
        .route(
            &format!("{base}/{{id}}"),
            get(get_entry::<R>).delete(delete_entry::<R>),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Ledger listing filters, paging and sort.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EntrySearchRequest {
    /// Substring of the title or name.
    pub search: Option<String>,
    /// First booking day, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Last booking day, inclusive.
    pub date_to: Option<NaiveDate>,
    /// 1-based page.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
    /// Sort column: `date`, `amount`, `title`/`name` or `created_at`.
    pub sort_by: Option<String>,
    /// "asc" or "desc".
    pub sort_order: Option<SortDirection>,
}

impl EntrySearchRequest {
    fn criteria(&self) -> EntryCriteria {
        let mut criteria = EntryCriteria::new();
        if let Some(search) = &self.search {
            criteria = criteria.search(search);
        }
        criteria.between(self.date_from, self.date_to)
    }

    fn sort(&self) -> EntrySort {
        let field = self
            .sort_by
            .as_deref()
            .and_then(EntrySortField::parse)
            .unwrap_or_default();
        EntrySort::new(field, self.sort_order.unwrap_or_default())
    }
}

/// One page of entries plus the total of every match.
#[derive(Debug, Serialize)]
pub struct EntryPage<E> {
    /// Entries on this page.
    pub data: Vec<E>,
    /// Pagination metadata.
    pub meta: PageMeta,
    /// Sum of all matching entries, not just this page.
    pub total_amount: Decimal,
}

/// Export window and filter.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EntryExportQuery {
    /// Substring of the title or name.
    pub search: Option<String>,
    /// First booking day, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Last booking day, inclusive.
    pub date_to: Option<NaiveDate>,
}

fn not_found<R: LedgerResource>() -> ApiError {
    ApiError::from(AppError::NotFound(format!("{} not found", R::KIND)))
}

// ============================================================================
// Handlers
// ============================================================================

async fn create_entry<R: LedgerResource>(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<R::Input>,
) -> ApiResult<R::Entry> {
    let entry = R::build(&input, Utc::now())?;
    let saved = R::open(state.connection()).create(&entry).await?;
    Ok(ApiResponse::created(
        format!("{} created successfully", R::KIND),
        saved,
    ))
}

async fn search_entries<R: LedgerResource>(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EntrySearchRequest>,
) -> ApiResult<EntryPage<R::Entry>> {
    let page = state.page(request.page, request.per_page);
    let matching = R::open(state.connection())
        .find(&request.criteria(), request.sort(), None)
        .await?;

    let total_amount = sum_amounts(&matching);
    let total = matching.len() as u64;
    let data: Vec<R::Entry> = matching
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .collect();

    Ok(ApiResponse::ok(
        format!("{} entries fetched successfully", R::KIND),
        EntryPage {
            data,
            meta: PageMeta::new(page, total),
            total_amount,
        },
    ))
}

async fn entry_summary<R: LedgerResource>(
    State(state): State<AppState>,
) -> ApiResult<EntrySummary> {
    let entries = R::open(state.connection()).find_all().await?;
    let summary = summarize_entries(&entries, Utc::now().date_naive());
    Ok(ApiResponse::ok(
        format!("{} summary fetched successfully", R::KIND),
        summary,
    ))
}

async fn get_entry<R: LedgerResource>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<R::Id>,
) -> ApiResult<R::Entry> {
    let entry = R::open(state.connection())
        .find_by_id(id)
        .await?
        .ok_or_else(not_found::<R>)?;
    Ok(ApiResponse::ok(
        format!("{} fetched successfully", R::KIND),
        entry,
    ))
}

async fn delete_entry<R: LedgerResource>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<R::Id>,
) -> ApiResult<String> {
    let repo = R::open(state.connection());
    let entry = repo.find_by_id(id).await?.ok_or_else(not_found::<R>)?;
    R::check_delete(&entry)?;
    if !repo.delete_by_id(id).await? {
        return Err(not_found::<R>());
    }
    Ok(ApiResponse::ok(
        format!("{} deleted successfully", R::KIND),
        id.to_string(),
    ))
}

async fn export_entries<R: LedgerResource>(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EntryExportQuery>,
) -> Result<Response, ApiError> {
    let mut criteria = EntryCriteria::new().between(query.date_from, query.date_to);
    if let Some(search) = &query.search {
        criteria = criteria.search(search);
    }
    let entries = R::open(state.connection())
        .find(
            &criteria,
            EntrySort::new(EntrySortField::Date, SortDirection::Asc),
            None,
        )
        .await?;
    csv_attachment(&format!("{}.csv", R::PATH), &R::table(&entries))
}

async fn reset_profits(State(state): State<AppState>) -> ApiResult<ResetSummary> {
    let summary = state.loan_service().reset_all_profits().await?;
    Ok(ApiResponse::ok("All profits reset successfully", summary))
}
