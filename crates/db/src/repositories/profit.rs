//! Profit ledger contract for loan-linked entries.

use lendbook_core::finance::ProfitEntry;
use lendbook_core::loan::{ProfitLedger, StoreError};
use lendbook_shared::types::LoanId;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::info;

use super::ledger::{LedgerRepository, ProfitRepository, profit_from_model, profit_to_active};
use super::store_error;
use crate::entities::profits;

impl ProfitLedger for ProfitRepository {
    async fn find_by_loan_ref(&self, loan_id: LoanId) -> Result<Option<ProfitEntry>, StoreError> {
        profits::Entity::find()
            .filter(profits::Column::LoanRef.eq(loan_id.into_inner()))
            .one(self.connection())
            .await
            .map_err(store_error("profits.find_by_loan_ref"))?
            .map(profit_from_model)
            .transpose()
    }

    async fn upsert(&self, entry: &ProfitEntry) -> Result<ProfitEntry, StoreError> {
        let Some(loan_id) = entry.loan_ref else {
            return self.create(entry).await;
        };

        // One statement, so concurrent upserts for a loan converge on one row
        profits::Entity::insert(profit_to_active(entry))
            .on_conflict(
                OnConflict::column(profits::Column::LoanRef)
                    .update_columns([
                        profits::Column::Title,
                        profits::Column::Amount,
                        profits::Column::Date,
                        profits::Column::Description,
                        profits::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.connection())
            .await
            .map_err(store_error("profits.upsert"))?;

        let saved = self.find_by_loan_ref(loan_id).await?.ok_or_else(|| {
            StoreError::Database(format!("profit entry for loan {loan_id} missing after upsert"))
        })?;
        info!(loan_id = %loan_id, profit_id = %saved.id, amount = %saved.amount, "Manual profit upserted");
        Ok(saved)
    }

    async fn delete_by_loan_ref(&self, loan_id: LoanId) -> Result<u64, StoreError> {
        let result = profits::Entity::delete_many()
            .filter(profits::Column::LoanRef.eq(loan_id.into_inner()))
            .exec(self.connection())
            .await
            .map_err(store_error("profits.delete_by_loan_ref"))?;
        Ok(result.rows_affected)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = profits::Entity::delete_many()
            .exec(self.connection())
            .await
            .map_err(store_error("profits.delete_all"))?;
        info!(removed = result.rows_affected, "Profit ledger cleared");
        Ok(result.rows_affected)
    }
}
