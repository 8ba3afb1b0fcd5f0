//! `SeaORM` Entity for loans table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub aadhaar: Option<String>,
    pub pan: Option<String>,
    pub referrer: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub loan_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub given_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub per_day_collection: Decimal,
    pub days_for_loan: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_paid_loan: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub remaining_loan: Decimal,
    pub total_paid_installments: i32,
    pub total_due_installments: i32,
    pub status: String,
    pub loan_start_date: Option<Date>,
    pub loan_end_date: Option<Date>,
    pub loan_type: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub manual_profit: Option<Decimal>,
    pub cycle: i32,
    pub version: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::loan_installments::Entity")]
    LoanInstallments,
    #[sea_orm(has_many = "super::profits::Entity")]
    Profits,
}

impl Related<super::loan_installments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanInstallments.def()
    }
}

impl Related<super::profits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
