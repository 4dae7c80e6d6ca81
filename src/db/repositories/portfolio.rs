use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entities::portfolios;

pub struct PortfolioRepository {
    conn: DatabaseConnection,
}

impl PortfolioRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<portfolios::Model>> {
        portfolios::Entity::find()
            .filter(portfolios::Column::UserId.eq(user_id))
            .order_by_desc(portfolios::Column::PurchaseDate)
            .all(&self.conn)
            .await
            .context("Failed to list portfolio entries")
    }

    pub async fn list_all(&self, user_id: Option<&str>) -> Result<Vec<portfolios::Model>> {
        let mut query = portfolios::Entity::find();
        if let Some(user_id) = user_id {
            query = query.filter(portfolios::Column::UserId.eq(user_id));
        }

        query
            .order_by_desc(portfolios::Column::PurchaseDate)
            .all(&self.conn)
            .await
            .context("Failed to list portfolio entries")
    }

    pub async fn total_invested(&self) -> Result<i64> {
        let amounts: Vec<i64> = portfolios::Entity::find()
            .select_only()
            .column(portfolios::Column::Amount)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to sum invested amounts")?;

        Ok(amounts.into_iter().sum())
    }
}
