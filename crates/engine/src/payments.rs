//! Payment primitives.
//!
//! A `Payment` is a single recorded contribution by a minister on a given
//! date. Each payment belongs to exactly one minister; deleting the minister
//! deletes its payments.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub minister_id: i32,
    pub amount: f64,
    pub payment_date: Date,
    pub week_number: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ministers::Entity",
        from = "Column::MinisterId",
        to = "super::ministers::Column::Id",
        on_delete = "Cascade"
    )]
    Ministers,
}

impl Related<super::ministers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ministers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Input for creating or updating a payment.
///
/// `week_number` left as `None` is derived by the engine as the ISO-8601 week
/// of `payment_date`.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentDraft {
    pub minister_id: i32,
    pub amount: f64,
    pub payment_date: Date,
    pub week_number: Option<i32>,
    pub note: Option<String>,
}
