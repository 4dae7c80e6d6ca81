use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Uppercased tag, typically "GES" (solar) or "RES" (wind).
    pub project_type: String,

    pub description: String,

    pub location: String,

    pub capacity: String,

    /// Headline monthly return rate shown on the listing.
    pub return_rate: f64,

    pub total_target: i64,

    /// Only ever incremented by successful investments.
    pub funded_amount: i64,

    /// Only ever incremented by successful investments.
    pub investors_count: i32,

    pub image_url: String,

    pub details: String,

    pub status: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
