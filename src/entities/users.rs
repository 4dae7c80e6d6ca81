use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id hash. None for accounts created through the external
    /// identity provider.
    pub password_hash: Option<String>,

    pub name: String,

    pub phone: String,

    pub picture: String,

    /// "investor" or "admin"
    pub role: String,

    /// "pending" | "submitted" | "approved" | "rejected"
    pub kyc_status: String,

    /// Whole currency units. Mutated only by ledger operations.
    pub balance: i64,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
