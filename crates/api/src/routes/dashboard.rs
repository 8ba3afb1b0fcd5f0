//! Dashboard aggregate.

use axum::{Router, extract::State, routing::get};
use lendbook_core::query::{LoanCriteria, LoanSort};
use lendbook_core::summary::{DashboardInput, DashboardMetrics, build_dashboard};
use lendbook_db::{
    ExpenseRepository, InvestmentRepository, LedgerRepository, ProfitRepository,
    ReserveFundRepository,
};

use crate::AppState;
use crate::response::{ApiError, ApiResponse, ApiResult};

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

async fn dashboard(State(state): State<AppState>) -> ApiResult<DashboardMetrics> {
    let db = state.connection();
    let loans = state
        .loan_service()
        .all_loans(&LoanCriteria::new(), LoanSort::default())
        .await?;
    let profit_repo = ProfitRepository::new(db.clone());
    let expense_repo = ExpenseRepository::new(db.clone());
    let investment_repo = InvestmentRepository::new(db.clone());
    let reserve_repo = ReserveFundRepository::new(db);

    let (profits, expenses, investments, reserves) = tokio::try_join!(
        profit_repo.find_all(),
        expense_repo.find_all(),
        investment_repo.find_all(),
        reserve_repo.find_all(),
    )
    .map_err(ApiError::from)?;

    let metrics = build_dashboard(&DashboardInput {
        loans: &loans,
        profits: &profits,
        expenses: &expenses,
        investments: &investments,
        reserves: &reserves,
    });
    Ok(ApiResponse::ok("Dashboard data fetched successfully", metrics))
}
