use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use crate::entities::transactions;

pub struct TransactionRepository {
    conn: DatabaseConnection,
}

impl TransactionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<transactions::Model>> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list transactions")
    }

    pub async fn list_all(&self, status: Option<&str>) -> Result<Vec<transactions::Model>> {
        let mut query = transactions::Entity::find();
        if let Some(status) = status {
            query = query.filter(transactions::Column::Status.eq(status));
        }

        query
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list transactions")
    }

    pub async fn count_pending(&self) -> Result<u64> {
        transactions::Entity::find()
            .filter(transactions::Column::Status.eq("pending"))
            .count(&self.conn)
            .await
            .context("Failed to count pending transactions")
    }
}
