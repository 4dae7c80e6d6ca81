use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One share purchase. Immutable once created except for deletion on sale;
/// there is no partial sell.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "portfolios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    pub project_id: String,

    /// Snapshot of the project name at purchase time.
    pub project_name: String,

    pub project_type: String,

    pub amount: i64,

    /// amount / SHARE_PRICE, exact by construction.
    pub shares: i32,

    pub monthly_return: f64,

    pub return_rate: f64,

    pub usd_based: bool,

    /// FX rate captured at purchase. Set only when usd_based.
    pub usd_rate_at_purchase: Option<f64>,

    pub purchase_date: String,

    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
