//! Repositories for the four finance ledgers.
//!
//! The ledgers share one shape (label, amount, date, description), so their
//! repositories are generated from a single definition.

use std::fmt::Display;
use std::future::Future;

use lendbook_core::finance::{
    DurationType, ExpenseEntry, InvestmentEntry, LedgerEntry, LedgerKind, ProfitEntry,
    ReserveFundEntry,
};
use lendbook_core::loan::StoreError;
use lendbook_core::query::{EntryCriteria, EntrySort, EntrySortField};
use lendbook_shared::types::{
    ExpenseId, InvestmentId, LoanId, PageRequest, ProfitId, ReserveFundId, SortDirection,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use super::{contains_any, store_error};
use crate::entities::{expenses, investments, profits, reserve_funds};

/// Conversion between a ledger row and its domain entry.
trait LedgerRow: Sized {
    type Model;
    type Active;

    fn from_model(model: Self::Model) -> Result<Self, StoreError>;
    fn to_active(&self) -> Self::Active;
}

impl LedgerRow for ProfitEntry {
    type Model = profits::Model;
    type Active = profits::ActiveModel;

    fn from_model(model: profits::Model) -> Result<Self, StoreError> {
        Ok(Self {
            id: ProfitId::from_uuid(model.id),
            title: model.title,
            amount: model.amount.normalize(),
            date: model.date,
            description: model.description,
            loan_ref: model.loan_ref.map(LoanId::from_uuid),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn to_active(&self) -> profits::ActiveModel {
        profits::ActiveModel {
            id: Set(self.id.into_inner()),
            title: Set(self.title.clone()),
            amount: Set(self.amount),
            date: Set(self.date),
            description: Set(self.description.clone()),
            loan_ref: Set(self.loan_ref.map(LoanId::into_inner)),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}

impl LedgerRow for ExpenseEntry {
    type Model = expenses::Model;
    type Active = expenses::ActiveModel;

    fn from_model(model: expenses::Model) -> Result<Self, StoreError> {
        Ok(Self {
            id: ExpenseId::from_uuid(model.id),
            name: model.name,
            date: model.date,
            amount: model.amount.normalize(),
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn to_active(&self) -> expenses::ActiveModel {
        expenses::ActiveModel {
            id: Set(self.id.into_inner()),
            name: Set(self.name.clone()),
            amount: Set(self.amount),
            date: Set(self.date),
            description: Set(self.description.clone()),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}

impl LedgerRow for InvestmentEntry {
    type Model = investments::Model;
    type Active = investments::ActiveModel;

    fn from_model(model: investments::Model) -> Result<Self, StoreError> {
        let duration_type = DurationType::parse(&model.duration_type).ok_or_else(|| {
            StoreError::Database(format!("invalid duration type '{}'", model.duration_type))
        })?;
        Ok(Self {
            id: InvestmentId::from_uuid(model.id),
            name: model.name,
            date: model.date,
            amount: model.amount.normalize(),
            duration_type,
            duration_value: model.duration_value,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn to_active(&self) -> investments::ActiveModel {
        investments::ActiveModel {
            id: Set(self.id.into_inner()),
            name: Set(self.name.clone()),
            amount: Set(self.amount),
            date: Set(self.date),
            duration_type: Set(self.duration_type.as_str().to_string()),
            duration_value: Set(self.duration_value),
            description: Set(self.description.clone()),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}

impl LedgerRow for ReserveFundEntry {
    type Model = reserve_funds::Model;
    type Active = reserve_funds::ActiveModel;

    fn from_model(model: reserve_funds::Model) -> Result<Self, StoreError> {
        Ok(Self {
            id: ReserveFundId::from_uuid(model.id),
            title: model.title,
            date: model.date,
            amount: model.amount.normalize(),
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn to_active(&self) -> reserve_funds::ActiveModel {
        reserve_funds::ActiveModel {
            id: Set(self.id.into_inner()),
            title: Set(self.title.clone()),
            amount: Set(self.amount),
            date: Set(self.date),
            description: Set(self.description.clone()),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}

const fn order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

/// Common operations of a finance ledger repository.
pub trait LedgerRepository: Send + Sync {
    /// Domain entry.
    type Entry: LedgerEntry + Serialize + Clone + Send + Sync + 'static;
    /// Entry ID.
    type Id: Copy + Display + DeserializeOwned + Send + Sync + 'static;
    /// Which ledger this is.
    const KIND: LedgerKind;

    /// Inserts an entry.
    fn create(
        &self,
        entry: &Self::Entry,
    ) -> impl Future<Output = Result<Self::Entry, StoreError>> + Send;

    /// Entries matching `criteria`, sorted and optionally paginated.
    fn find(
        &self,
        criteria: &EntryCriteria,
        sort: EntrySort,
        page: Option<PageRequest>,
    ) -> impl Future<Output = Result<Vec<Self::Entry>, StoreError>> + Send;

    /// Number of entries matching `criteria`.
    fn count(&self, criteria: &EntryCriteria)
    -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Finds an entry by ID.
    fn find_by_id(
        &self,
        id: Self::Id,
    ) -> impl Future<Output = Result<Option<Self::Entry>, StoreError>> + Send;

    /// Deletes an entry. Returns false when it did not exist.
    fn delete_by_id(&self, id: Self::Id) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Every entry, newest first.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Self::Entry>, StoreError>> + Send {
        async move {
            let criteria = EntryCriteria::new();
            self.find(&criteria, EntrySort::default(), None).await
        }
    }
}

macro_rules! ledger_repository {
    ($(#[$meta:meta])* $repo:ident, $table:ident, $entry:ty, $id:ty, $label:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $repo {
            db: DatabaseConnection,
        }

        impl $repo {
            /// Creates a new repository.
            #[must_use]
            pub const fn new(db: DatabaseConnection) -> Self {
                Self { db }
            }

            fn condition(criteria: &EntryCriteria) -> Condition {
                let mut condition = Condition::all();
                if let Some(search) = &criteria.search {
                    condition = condition.add(contains_any(
                        &[$table::Column::$label, $table::Column::Description],
                        search,
                    ));
                }
                if let Some(from) = criteria.date_from {
                    condition = condition.add($table::Column::Date.gte(from));
                }
                if let Some(to) = criteria.date_to {
                    condition = condition.add($table::Column::Date.lte(to));
                }
                condition
            }
        }

        impl LedgerRepository for $repo {
            type Entry = $entry;
            type Id = $id;
            const KIND: LedgerKind = $kind;

            async fn create(&self, entry: &$entry) -> Result<$entry, StoreError> {
                let model = entry
                    .to_active()
                    .insert(&self.db)
                    .await
                    .map_err(store_error(concat!(stringify!($table), ".insert")))?;
                info!(kind = %Self::KIND, id = %model.id, amount = %model.amount, "Ledger entry created");
                <$entry>::from_model(model)
            }

            async fn find(
                &self,
                criteria: &EntryCriteria,
                sort: EntrySort,
                page: Option<PageRequest>,
            ) -> Result<Vec<$entry>, StoreError> {
                let column = match sort.field {
                    EntrySortField::CreatedAt => $table::Column::CreatedAt,
                    EntrySortField::Date => $table::Column::Date,
                    EntrySortField::Amount => $table::Column::Amount,
                    EntrySortField::Label => $table::Column::$label,
                };
                let mut query = $table::Entity::find()
                    .filter(Self::condition(criteria))
                    .order_by(column, order(sort.direction))
                    .order_by($table::Column::Id, order(sort.direction));
                if let Some(page) = page {
                    query = query.offset(page.offset()).limit(page.limit());
                }
                query
                    .all(&self.db)
                    .await
                    .map_err(store_error(concat!(stringify!($table), ".find")))?
                    .into_iter()
                    .map(<$entry>::from_model)
                    .collect()
            }

            async fn count(&self, criteria: &EntryCriteria) -> Result<u64, StoreError> {
                $table::Entity::find()
                    .filter(Self::condition(criteria))
                    .count(&self.db)
                    .await
                    .map_err(store_error(concat!(stringify!($table), ".count")))
            }

            async fn find_by_id(&self, id: $id) -> Result<Option<$entry>, StoreError> {
                $table::Entity::find_by_id(id.into_inner())
                    .one(&self.db)
                    .await
                    .map_err(store_error(concat!(stringify!($table), ".find_by_id")))?
                    .map(<$entry>::from_model)
                    .transpose()
            }

            async fn delete_by_id(&self, id: $id) -> Result<bool, StoreError> {
                let result = $table::Entity::delete_by_id(id.into_inner())
                    .exec(&self.db)
                    .await
                    .map_err(store_error(concat!(stringify!($table), ".delete")))?;
                if result.rows_affected > 0 {
                    info!(kind = %Self::KIND, id = %id, "Ledger entry deleted");
                }
                Ok(result.rows_affected > 0)
            }
        }
    };
}

ledger_repository!(
    /// Profit ledger repository.
    ProfitRepository, profits, ProfitEntry, ProfitId, Title, LedgerKind::Profit
);
ledger_repository!(
    /// Expense ledger repository.
    ExpenseRepository, expenses, ExpenseEntry, ExpenseId, Name, LedgerKind::Expense
);
ledger_repository!(
    /// Investment ledger repository.
    InvestmentRepository, investments, InvestmentEntry, InvestmentId, Name, LedgerKind::Investment
);
ledger_repository!(
    /// Reserve fund ledger repository.
    ReserveFundRepository, reserve_funds, ReserveFundEntry, ReserveFundId, Title, LedgerKind::ReserveFund
);

impl ProfitRepository {
    pub(crate) const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

pub(crate) fn profit_from_model(model: profits::Model) -> Result<ProfitEntry, StoreError> {
    ProfitEntry::from_model(model)
}

pub(crate) fn profit_to_active(entry: &ProfitEntry) -> profits::ActiveModel {
    entry.to_active()
}
