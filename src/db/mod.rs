use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{banks, kyc_documents, notifications, portfolios, projects, transactions, users};

pub mod migrator;
pub mod repositories;

pub use repositories::bank::BankInput;
pub use repositories::project::ProjectInput;
pub use repositories::user::NewUser;

/// Prefixed 12-hex-char identifier, e.g. `user_3fa85f64d0c2`.
#[must_use]
pub fn new_id(prefix: &str) -> String {
    format!(
        "{}_{}",
        prefix,
        &uuid::Uuid::new_v4().simple().to_string()[..12]
    )
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // An in-memory sqlite database exists per connection, so the pool
        // must stay at exactly one or queries would see empty databases.
        let in_memory = db_url.contains(":memory:");
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn project_repo(&self) -> repositories::project::ProjectRepository {
        repositories::project::ProjectRepository::new(self.conn.clone())
    }

    fn portfolio_repo(&self) -> repositories::portfolio::PortfolioRepository {
        repositories::portfolio::PortfolioRepository::new(self.conn.clone())
    }

    fn transaction_repo(&self) -> repositories::transaction::TransactionRepository {
        repositories::transaction::TransactionRepository::new(self.conn.clone())
    }

    fn notification_repo(&self) -> repositories::notification::NotificationRepository {
        repositories::notification::NotificationRepository::new(self.conn.clone())
    }

    fn bank_repo(&self) -> repositories::bank::BankRepository {
        repositories::bank::BankRepository::new(self.conn.clone())
    }

    fn kyc_repo(&self) -> repositories::kyc::KycRepository {
        repositories::kyc::KycRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn get_user(&self, id: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn create_user(&self, new: NewUser) -> Result<users::Model> {
        self.user_repo().create(new).await
    }

    pub async fn verify_user_password(&self, hash: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(hash, password).await
    }

    pub async fn update_user_password(&self, user: users::Model, new_password: &str) -> Result<()> {
        self.user_repo().update_password(user, new_password).await
    }

    pub async fn update_user_identity(
        &self,
        user: users::Model,
        name: &str,
        picture: &str,
    ) -> Result<users::Model> {
        self.user_repo().update_identity(user, name, picture).await
    }

    pub async fn set_user_role(&self, user: users::Model, role: &str) -> Result<()> {
        self.user_repo().set_role(user, role).await
    }

    pub async fn set_user_kyc_status(&self, user_id: &str, status: &str) -> Result<()> {
        self.user_repo().set_kyc_status(user_id, status).await
    }

    pub async fn update_user_info(
        &self,
        user: users::Model,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<users::Model> {
        self.user_repo().update_info(user, name, email, phone).await
    }

    pub async fn list_users(&self) -> Result<Vec<users::Model>> {
        self.user_repo().list_all().await
    }

    pub async fn count_investors(&self) -> Result<u64> {
        self.user_repo().count_investors().await
    }

    pub async fn total_investor_balance(&self) -> Result<i64> {
        self.user_repo().total_investor_balance().await
    }

    // ========== Projects ==========

    pub async fn list_projects(&self, project_type: Option<&str>) -> Result<Vec<projects::Model>> {
        self.project_repo().list(project_type).await
    }

    pub async fn get_project(&self, id: &str) -> Result<Option<projects::Model>> {
        self.project_repo().get(id).await
    }

    pub async fn create_project(&self, input: ProjectInput) -> Result<projects::Model> {
        self.project_repo().create(input).await
    }

    pub async fn update_project(
        &self,
        project: projects::Model,
        input: ProjectInput,
    ) -> Result<projects::Model> {
        self.project_repo().update(project, input).await
    }

    // ========== Portfolios ==========

    pub async fn list_portfolio(&self, user_id: &str) -> Result<Vec<portfolios::Model>> {
        self.portfolio_repo().list_for_user(user_id).await
    }

    pub async fn list_all_portfolios(&self, user_id: Option<&str>) -> Result<Vec<portfolios::Model>> {
        self.portfolio_repo().list_all(user_id).await
    }

    pub async fn total_invested(&self) -> Result<i64> {
        self.portfolio_repo().total_invested().await
    }

    // ========== Transactions ==========

    pub async fn list_transactions(&self, user_id: &str) -> Result<Vec<transactions::Model>> {
        self.transaction_repo().list_for_user(user_id).await
    }

    pub async fn list_all_transactions(&self, status: Option<&str>) -> Result<Vec<transactions::Model>> {
        self.transaction_repo().list_all(status).await
    }

    pub async fn count_pending_transactions(&self) -> Result<u64> {
        self.transaction_repo().count_pending().await
    }

    // ========== Notifications ==========

    pub async fn add_notification(
        &self,
        user_id: &str,
        kind: &str,
        title: &str,
        message: &str,
    ) -> Result<()> {
        self.notification_repo().add(user_id, kind, title, message).await
    }

    pub async fn list_notifications(&self, user_id: &str) -> Result<Vec<notifications::Model>> {
        self.notification_repo().list_for_user(user_id).await
    }

    pub async fn unread_notification_count(&self, user_id: &str) -> Result<u64> {
        self.notification_repo().unread_count(user_id).await
    }

    pub async fn mark_notification_read(&self, id: &str, user_id: &str) -> Result<bool> {
        self.notification_repo().mark_read(id, user_id).await
    }

    pub async fn mark_all_notifications_read(&self, user_id: &str) -> Result<u64> {
        self.notification_repo().mark_all_read(user_id).await
    }

    // ========== Banks ==========

    pub async fn list_banks(&self) -> Result<Vec<banks::Model>> {
        self.bank_repo().list_active().await
    }

    pub async fn get_bank(&self, id: &str) -> Result<Option<banks::Model>> {
        self.bank_repo().get(id).await
    }

    pub async fn create_bank(&self, input: BankInput) -> Result<banks::Model> {
        self.bank_repo().create(input).await
    }

    pub async fn update_bank(&self, bank: banks::Model, input: BankInput) -> Result<banks::Model> {
        self.bank_repo().update(bank, input).await
    }

    pub async fn deactivate_bank(&self, id: &str) -> Result<bool> {
        self.bank_repo().deactivate(id).await
    }

    // ========== KYC ==========

    pub async fn submit_kyc(
        &self,
        user: &users::Model,
        front_image: &str,
        back_image: &str,
    ) -> Result<kyc_documents::Model> {
        self.kyc_repo()
            .replace_for_user(user, front_image, back_image)
            .await
    }

    pub async fn get_kyc_for_user(&self, user_id: &str) -> Result<Option<kyc_documents::Model>> {
        self.kyc_repo().get_for_user(user_id).await
    }

    pub async fn get_kyc(&self, id: &str) -> Result<Option<kyc_documents::Model>> {
        self.kyc_repo().get(id).await
    }

    pub async fn list_kyc_submissions(&self) -> Result<Vec<kyc_documents::Model>> {
        self.kyc_repo().list_all().await
    }

    pub async fn set_kyc_document_status(
        &self,
        document: kyc_documents::Model,
        status: &str,
    ) -> Result<()> {
        self.kyc_repo().set_status(document, status).await
    }
}
