use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::db::new_id;
use crate::entities::notifications;

pub struct NotificationRepository {
    conn: DatabaseConnection,
}

/// Insert a notification on an arbitrary connection, so ledger operations
/// can include it in their transaction.
pub async fn push<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    kind: &str,
    title: &str,
    message: &str,
) -> Result<()> {
    let model = notifications::ActiveModel {
        id: Set(new_id("ntf")),
        user_id: Set(user_id.to_string()),
        kind: Set(kind.to_string()),
        title: Set(title.to_string()),
        message: Set(message.to_string()),
        is_read: Set(false),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
    };

    model.insert(conn).await.context("Failed to insert notification")?;
    Ok(())
}

impl NotificationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, user_id: &str, kind: &str, title: &str, message: &str) -> Result<()> {
        push(&self.conn, user_id, kind, title, message).await
    }

    /// Most recent notifications for a user, capped at 50.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<notifications::Model>> {
        notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .limit(50)
            .all(&self.conn)
            .await
            .context("Failed to list notifications")
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<u64> {
        notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .count(&self.conn)
            .await
            .context("Failed to count unread notifications")
    }

    /// Marks one notification read. Returns false when it does not exist or
    /// belongs to another user.
    pub async fn mark_read(&self, id: &str, user_id: &str) -> Result<bool> {
        let updated = notifications::Entity::update_many()
            .col_expr(
                notifications::Column::IsRead,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(notifications::Column::Id.eq(id))
            .filter(notifications::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to mark notification read")?;

        Ok(updated.rows_affected > 0)
    }

    pub async fn mark_all_read(&self, user_id: &str) -> Result<u64> {
        let updated = notifications::Entity::update_many()
            .col_expr(
                notifications::Column::IsRead,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(&self.conn)
            .await
            .context("Failed to mark notifications read")?;

        Ok(updated.rows_affected)
    }
}
