//! Loan repository backed by the `loans` and `loan_installments` tables.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, Utc};
use lendbook_core::loan::{
    Installment, LoanRecord, LoanStatus, LoanStore, LoanType, StoreError,
};
use lendbook_core::query::{LoanCriteria, LoanSort, LoanSortField};
use lendbook_shared::types::{LoanId, PageRequest, SortDirection};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::{contains_any, store_error};
use crate::entities::{loan_installments, loans};

/// Loan repository implementing [`LoanStore`].
#[derive(Debug, Clone)]
pub struct LoanRepository {
    db: DatabaseConnection,
}

impl LoanRepository {
    /// Creates a new loan repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads installments for `models` and assembles the records.
    async fn with_installments(&self, models: Vec<loans::Model>) -> Result<Vec<LoanRecord>, StoreError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let rows = loan_installments::Entity::find()
            .filter(loan_installments::Column::LoanId.is_in(ids))
            .order_by_asc(loan_installments::Column::LoanId)
            .order_by_asc(loan_installments::Column::Sequence)
            .all(&self.db)
            .await
            .map_err(store_error("loan_installments.find"))?;

        let mut by_loan: HashMap<Uuid, Vec<loan_installments::Model>> = HashMap::new();
        for row in rows {
            by_loan.entry(row.loan_id).or_default().push(row);
        }
        models
            .into_iter()
            .map(|model| {
                let installments = by_loan.remove(&model.id).unwrap_or_default();
                to_record(model, installments)
            })
            .collect()
    }
}

impl LoanStore for LoanRepository {
    async fn find(
        &self,
        criteria: &LoanCriteria,
        sort: LoanSort,
        page: Option<PageRequest>,
    ) -> Result<Vec<LoanRecord>, StoreError> {
        let order = match sort.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };
        let mut query = select(criteria)
            .order_by(sort_column(sort.field), order.clone())
            .order_by(loans::Column::Id, order);
        if let Some(page) = page {
            query = query.offset(page.offset()).limit(page.limit());
        }
        let models = query
            .all(&self.db)
            .await
            .map_err(store_error("loans.find"))?;
        self.with_installments(models).await
    }

    async fn count(&self, criteria: &LoanCriteria) -> Result<u64, StoreError> {
        select(criteria)
            .count(&self.db)
            .await
            .map_err(store_error("loans.count"))
    }

    async fn find_by_id(&self, id: LoanId) -> Result<Option<LoanRecord>, StoreError> {
        let model = loans::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error("loans.find_by_id"))?;
        Ok(self
            .with_installments(model.into_iter().collect())
            .await?
            .pop())
    }

    async fn find_latest_by_phone(&self, phone: &str) -> Result<Option<LoanRecord>, StoreError> {
        let model = loans::Entity::find()
            .filter(loans::Column::Phone.eq(phone))
            .order_by_desc(loans::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(store_error("loans.find_latest_by_phone"))?;
        Ok(self
            .with_installments(model.into_iter().collect())
            .await?
            .pop())
    }

    async fn create(&self, loan: &LoanRecord) -> Result<LoanRecord, StoreError> {
        let txn = self.db.begin().await.map_err(store_error("loans.begin"))?;

        to_active(loan, 1)
            .insert(&txn)
            .await
            .map_err(store_error("loans.insert"))?;
        let installments = installment_models(loan, 0)?;
        if !installments.is_empty() {
            loan_installments::Entity::insert_many(installments)
                .exec(&txn)
                .await
                .map_err(store_error("loan_installments.insert"))?;
        }

        txn.commit().await.map_err(store_error("loans.commit"))?;
        info!(loan_id = %loan.id, "Loan row inserted");

        Ok(LoanRecord {
            version: 1,
            ..loan.clone()
        })
    }

    async fn update(&self, loan: &LoanRecord, expected_version: i64) -> Result<LoanRecord, StoreError> {
        let next_version = expected_version + 1;
        let txn = self.db.begin().await.map_err(store_error("loans.begin"))?;

        let mut active = to_active(loan, next_version);
        active.id = NotSet;
        active.created_at = NotSet;
        let result = loans::Entity::update_many()
            .set(active)
            .filter(loans::Column::Id.eq(loan.id.into_inner()))
            .filter(loans::Column::Version.eq(expected_version))
            .exec(&txn)
            .await
            .map_err(store_error("loans.update"))?;
        if result.rows_affected == 0 {
            debug!(loan_id = %loan.id, expected_version, "Stale loan version");
            return Err(StoreError::Conflict);
        }

        let stored = loan_installments::Entity::find()
            .filter(loan_installments::Column::LoanId.eq(loan.id.into_inner()))
            .count(&txn)
            .await
            .map_err(store_error("loan_installments.count"))?;
        let stored = usize::try_from(stored)
            .map_err(|_| StoreError::Database("installment count out of range".into()))?;
        let appended = installment_models(loan, stored)?;
        if !appended.is_empty() {
            loan_installments::Entity::insert_many(appended)
                .exec(&txn)
                .await
                .map_err(store_error("loan_installments.insert"))?;
        }

        txn.commit().await.map_err(store_error("loans.commit"))?;

        Ok(LoanRecord {
            version: next_version,
            ..loan.clone()
        })
    }

    async fn delete_by_id(&self, id: LoanId) -> Result<bool, StoreError> {
        let result = loans::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(store_error("loans.delete"))?;
        Ok(result.rows_affected > 0)
    }

    async fn clear_manual_profits(&self) -> Result<u64, StoreError> {
        let result = loans::Entity::update_many()
            .col_expr(loans::Column::ManualProfit, Expr::value(Option::<Decimal>::None))
            .col_expr(loans::Column::Version, Expr::col(loans::Column::Version).add(1))
            .col_expr(loans::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(loans::Column::ManualProfit.is_not_null())
            .exec(&self.db)
            .await
            .map_err(store_error("loans.clear_manual_profits"))?;
        Ok(result.rows_affected)
    }
}

/// Translates loan criteria into a filtered select.
fn select(criteria: &LoanCriteria) -> Select<loans::Entity> {
    loans::Entity::find().filter(condition(criteria))
}

fn condition(criteria: &LoanCriteria) -> Condition {
    let mut condition = Condition::all();
    if let Some(search) = &criteria.search {
        condition = condition.add(contains_any(
            &[loans::Column::Name, loans::Column::Phone, loans::Column::Referrer],
            search,
        ));
    }
    if let Some(status) = criteria.status {
        condition = condition.add(loans::Column::Status.eq(status.as_str()));
    }
    if let Some(from) = criteria.start_from {
        condition = condition.add(loans::Column::LoanStartDate.gte(from));
    }
    if let Some(to) = criteria.end_to {
        condition = condition.add(loans::Column::LoanEndDate.lte(to));
    }
    if let Some(ids) = &criteria.ids {
        condition = condition.add(loans::Column::Id.is_in(ids.iter().map(|id| id.into_inner())));
    }
    if let Some(from) = criteria.created_from {
        condition = condition.add(loans::Column::CreatedAt.gte(day_start(from)));
    }
    // Inclusive end day: strictly before the next midnight
    if let Some(next) = criteria.created_to.and_then(|to| to.succ_opt()) {
        condition = condition.add(loans::Column::CreatedAt.lt(day_start(next)));
    }
    condition
}

fn day_start(date: NaiveDate) -> chrono::DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

const fn sort_column(field: LoanSortField) -> loans::Column {
    match field {
        LoanSortField::CreatedAt => loans::Column::CreatedAt,
        LoanSortField::UpdatedAt => loans::Column::UpdatedAt,
        LoanSortField::Name => loans::Column::Name,
        LoanSortField::Phone => loans::Column::Phone,
        LoanSortField::LoanAmount => loans::Column::LoanAmount,
        LoanSortField::GivenAmount => loans::Column::GivenAmount,
        LoanSortField::RemainingLoan => loans::Column::RemainingLoan,
        LoanSortField::LoanStartDate => loans::Column::LoanStartDate,
        LoanSortField::LoanEndDate => loans::Column::LoanEndDate,
        LoanSortField::Status => loans::Column::Status,
    }
}

fn to_active(loan: &LoanRecord, version: i64) -> loans::ActiveModel {
    loans::ActiveModel {
        id: Set(loan.id.into_inner()),
        name: Set(loan.name.clone()),
        phone: Set(loan.phone.clone()),
        aadhaar: Set(loan.aadhaar.clone()),
        pan: Set(loan.pan.clone()),
        referrer: Set(loan.referrer.clone()),
        loan_amount: Set(loan.loan_amount),
        given_amount: Set(loan.given_amount),
        per_day_collection: Set(loan.per_day_collection),
        days_for_loan: Set(loan.days_for_loan),
        total_paid_loan: Set(loan.total_paid_loan),
        remaining_loan: Set(loan.remaining_loan),
        total_paid_installments: Set(loan.total_paid_installments),
        total_due_installments: Set(loan.total_due_installments),
        status: Set(loan.status.as_str().to_string()),
        loan_start_date: Set(loan.loan_start_date),
        loan_end_date: Set(loan.loan_end_date),
        loan_type: Set(loan.loan_type.as_str().to_string()),
        manual_profit: Set(loan.manual_profit),
        cycle: Set(loan.cycle),
        version: Set(version),
        created_at: Set(loan.created_at),
        updated_at: Set(loan.updated_at),
    }
}

/// Rows for the installments at positions `skip..`.
fn installment_models(
    loan: &LoanRecord,
    skip: usize,
) -> Result<Vec<loan_installments::ActiveModel>, StoreError> {
    let now = Utc::now();
    loan.installments
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(index, installment)| {
            let sequence = i32::try_from(index + 1)
                .map_err(|_| StoreError::Database("installment sequence out of range".into()))?;
            Ok(loan_installments::ActiveModel {
                id: Set(Uuid::now_v7()),
                loan_id: Set(loan.id.into_inner()),
                sequence: Set(sequence),
                amount: Set(installment.amount),
                paid_at: Set(installment.date),
                remaining_after_installment: Set(installment.remaining_after_installment),
                cycle: Set(installment.cycle),
                created_at: Set(now),
            })
        })
        .collect()
}

fn to_record(
    model: loans::Model,
    installments: Vec<loan_installments::Model>,
) -> Result<LoanRecord, StoreError> {
    let status = LoanStatus::parse(&model.status)
        .ok_or_else(|| StoreError::Database(format!("invalid loan status '{}'", model.status)))?;
    Ok(LoanRecord {
        id: LoanId::from_uuid(model.id),
        name: model.name,
        phone: model.phone,
        aadhaar: model.aadhaar,
        pan: model.pan,
        referrer: model.referrer,
        loan_amount: model.loan_amount.normalize(),
        given_amount: model.given_amount.normalize(),
        per_day_collection: model.per_day_collection.normalize(),
        days_for_loan: model.days_for_loan,
        total_paid_loan: model.total_paid_loan.normalize(),
        remaining_loan: model.remaining_loan.normalize(),
        total_paid_installments: model.total_paid_installments,
        total_due_installments: model.total_due_installments,
        status,
        loan_start_date: model.loan_start_date,
        loan_end_date: model.loan_end_date,
        loan_type: LoanType::from_input(&model.loan_type),
        manual_profit: model.manual_profit.map(|p| p.normalize()),
        installments: installments
            .into_iter()
            .map(|row| Installment {
                amount: row.amount.normalize(),
                date: row.paid_at,
                remaining_after_installment: row.remaining_after_installment.normalize(),
                cycle: row.cycle,
            })
            .collect(),
        cycle: model.cycle,
        version: model.version,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
