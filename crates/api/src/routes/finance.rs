//! Combined finance view.

use axum::{
    Router,
    extract::State,
    response::Response,
    routing::{get, post},
};
use chrono::NaiveDate;
use lendbook_core::finance::CombinedFinance;
use lendbook_core::query::{EntryCriteria, EntrySort, EntrySortField};
use lendbook_core::report::combined_table;
use lendbook_db::{
    ExpenseRepository, InvestmentRepository, LedgerRepository, ProfitRepository,
    ReserveFundRepository,
};
use lendbook_shared::types::SortDirection;
use serde::Deserialize;

use crate::AppState;
use crate::export::csv_attachment;
use crate::response::{ApiError, ApiJson, ApiQuery, ApiResponse, ApiResult};

/// Creates the finance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/finance/combined", post(combined_finance))
        .route("/finance/combined/export", get(export_combined_finance))
}

/// Booking-date window; open bounds are unrestricted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CombinedFinanceRequest {
    /// First day, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Last day, inclusive.
    pub date_to: Option<NaiveDate>,
}

async fn combined_finance(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CombinedFinanceRequest>,
) -> ApiResult<CombinedFinance> {
    let finance = load_combined(&state, &request).await?;
    Ok(ApiResponse::ok(
        "Combined finance data fetched successfully",
        finance,
    ))
}

async fn export_combined_finance(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CombinedFinanceRequest>,
) -> Result<Response, ApiError> {
    let finance = load_combined(&state, &query).await?;
    csv_attachment("combined-finance.csv", &combined_table(&finance))
}

/// Reads all four ledgers over the request window, newest first.
async fn load_combined(
    state: &AppState,
    request: &CombinedFinanceRequest,
) -> Result<CombinedFinance, ApiError> {
    let criteria = EntryCriteria::new().between(request.date_from, request.date_to);
    let sort = EntrySort::new(EntrySortField::Date, SortDirection::Desc);
    let db = state.connection();
    let profit_repo = ProfitRepository::new(db.clone());
    let expense_repo = ExpenseRepository::new(db.clone());
    let investment_repo = InvestmentRepository::new(db.clone());
    let reserve_repo = ReserveFundRepository::new(db);

    let (profits, expenses, investments, reserves) = tokio::try_join!(
        profit_repo.find(&criteria, sort, None),
        expense_repo.find(&criteria, sort, None),
        investment_repo.find(&criteria, sort, None),
        reserve_repo.find(&criteria, sort, None),
    )?;

    Ok(CombinedFinance::new(profits, expenses, investments, reserves))
}
