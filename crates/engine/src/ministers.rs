//! Minister primitives.
//!
//! A `Minister` is a contributing member of the saving scheme. The
//! `total_savings` column is denormalized: it always equals the sum of the
//! minister's payment amounts and is rewritten by the engine after every
//! payment mutation.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ministers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub full_name: String,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date_joined: Date,
    pub total_savings: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Input for creating or updating a minister.
///
/// Field-level validation (lengths, email shape) happens in the engine ops,
/// not here.
#[derive(Clone, Debug, PartialEq)]
pub struct MinisterDraft {
    pub full_name: String,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date_joined: Date,
}
