use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A deposit or withdrawal request. Balance is touched at approval time
/// only, and exactly once: the status transition out of "pending" is the
/// guard.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    pub user_name: String,

    /// "deposit" or "withdrawal"
    pub tx_type: String,

    pub amount: i64,

    pub bank_id: String,

    /// "pending" | "approved" | "rejected", terminal once resolved.
    pub status: String,

    pub created_at: String,

    /// Admin who resolved the transaction, when resolved.
    pub approved_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
