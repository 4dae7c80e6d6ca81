use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::db::new_id;
use crate::entities::{kyc_documents, users};

pub struct KycRepository {
    conn: DatabaseConnection,
}

impl KycRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Store a fresh submission, replacing any earlier one so a user always
    /// has at most one document set under review.
    pub async fn replace_for_user(
        &self,
        user: &users::Model,
        front_image: &str,
        back_image: &str,
    ) -> Result<kyc_documents::Model> {
        kyc_documents::Entity::delete_many()
            .filter(kyc_documents::Column::UserId.eq(&user.id))
            .exec(&self.conn)
            .await
            .context("Failed to clear previous KYC submission")?;

        let model = kyc_documents::ActiveModel {
            id: Set(new_id("kyc")),
            user_id: Set(user.id.clone()),
            user_name: Set(user.name.clone()),
            user_email: Set(user.email.clone()),
            front_image: Set(front_image.to_string()),
            back_image: Set(back_image.to_string()),
            status: Set("submitted".to_string()),
            submitted_at: Set(chrono::Utc::now().to_rfc3339()),
            reviewed_at: Set(None),
        };

        model
            .insert(&self.conn)
            .await
            .context("Failed to insert KYC submission")
    }

    pub async fn get_for_user(&self, user_id: &str) -> Result<Option<kyc_documents::Model>> {
        kyc_documents::Entity::find()
            .filter(kyc_documents::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query KYC submission")
    }

    pub async fn get(&self, id: &str) -> Result<Option<kyc_documents::Model>> {
        kyc_documents::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query KYC submission")
    }

    pub async fn list_all(&self) -> Result<Vec<kyc_documents::Model>> {
        kyc_documents::Entity::find()
            .order_by_desc(kyc_documents::Column::SubmittedAt)
            .all(&self.conn)
            .await
            .context("Failed to list KYC submissions")
    }

    pub async fn set_status(&self, document: kyc_documents::Model, status: &str) -> Result<()> {
        let mut active: kyc_documents::ActiveModel = document.into();
        active.status = Set(status.to_string());
        active.reviewed_at = Set(Some(chrono::Utc::now().to_rfc3339()));
        active.update(&self.conn).await?;
        Ok(())
    }
}
