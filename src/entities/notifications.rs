use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Append-only per-user message log. Only the read flag mutates.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    pub title: String,

    pub message: String,

    /// Category tag: "welcome", "investment", "sale", "kyc_approved", ...
    pub kind: String,

    pub is_read: bool,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
