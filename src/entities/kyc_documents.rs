use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One KYC submission (front + back document). Re-submission replaces the
/// previous record for the user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "kyc_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    pub user_name: String,

    pub user_email: String,

    pub front_image: String,

    pub back_image: String,

    pub status: String,

    pub submitted_at: String,

    pub reviewed_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
