use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::db::new_id;
use crate::entities::banks;

pub struct BankRepository {
    conn: DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct BankInput {
    pub name: String,
    pub iban: String,
    pub account_holder: String,
    pub logo_url: String,
}

impl BankRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_active(&self) -> Result<Vec<banks::Model>> {
        banks::Entity::find()
            .filter(banks::Column::IsActive.eq(true))
            .order_by_asc(banks::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list bank accounts")
    }

    pub async fn get(&self, id: &str) -> Result<Option<banks::Model>> {
        banks::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query bank account")
    }

    pub async fn create(&self, input: BankInput) -> Result<banks::Model> {
        let model = banks::ActiveModel {
            id: Set(new_id("bank")),
            name: Set(input.name),
            iban: Set(input.iban),
            account_holder: Set(input.account_holder),
            logo_url: Set(input.logo_url),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        model.insert(&self.conn).await.context("Failed to insert bank account")
    }

    pub async fn update(&self, bank: banks::Model, input: BankInput) -> Result<banks::Model> {
        let mut active: banks::ActiveModel = bank.into();
        active.name = Set(input.name);
        active.iban = Set(input.iban);
        active.account_holder = Set(input.account_holder);
        active.logo_url = Set(input.logo_url);

        active.update(&self.conn).await.context("Failed to update bank account")
    }

    /// Soft delete. The row stays for transaction history.
    pub async fn deactivate(&self, id: &str) -> Result<bool> {
        let updated = banks::Entity::update_many()
            .col_expr(banks::Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .filter(banks::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to deactivate bank account")?;

        Ok(updated.rows_affected > 0)
    }
}
