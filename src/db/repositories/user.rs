use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tokio::task;

use crate::db::new_id;
use crate::entities::users;

pub struct UserRepository {
    conn: DatabaseConnection,
}

pub struct NewUser {
    pub email: String,
    pub password: Option<String>,
    pub name: String,
    pub phone: String,
    pub picture: String,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<users::Model>> {
        users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by id")
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")
    }

    /// Insert a new investor account. The caller has already checked email
    /// uniqueness for a friendly error; the unique index is the backstop.
    pub async fn create(&self, new: NewUser) -> Result<users::Model> {
        let password_hash = match new.password {
            Some(password) => Some(
                task::spawn_blocking(move || hash_password(&password))
                    .await
                    .context("Password hashing task panicked")??,
            ),
            None => None,
        };

        let model = users::ActiveModel {
            id: Set(new_id("user")),
            email: Set(new.email),
            password_hash: Set(password_hash),
            name: Set(new.name),
            phone: Set(new.phone),
            picture: Set(new.picture),
            role: Set("investor".to_string()),
            kyc_status: Set("pending".to_string()),
            balance: Set(0),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        model.insert(&self.conn).await.context("Failed to insert user")
    }

    /// Verify a password against a stored Argon2id hash.
    /// Runs in `spawn_blocking` because Argon2 verification is CPU-bound.
    pub async fn verify_password(&self, hash: &str, password: &str) -> Result<bool> {
        let hash = hash.to_string();
        let password = password.to_string();

        task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")?
    }

    pub async fn update_password(&self, user: users::Model, new_password: &str) -> Result<()> {
        let password = new_password.to_string();
        let new_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(Some(new_hash));
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Refresh name/picture from the identity provider on repeat OAuth
    /// logins.
    pub async fn update_identity(&self, user: users::Model, name: &str, picture: &str) -> Result<users::Model> {
        let mut active: users::ActiveModel = user.into();
        active.name = Set(name.to_string());
        active.picture = Set(picture.to_string());
        Ok(active.update(&self.conn).await?)
    }

    pub async fn set_role(&self, user: users::Model, role: &str) -> Result<()> {
        let mut active: users::ActiveModel = user.into();
        active.role = Set(role.to_string());
        active.update(&self.conn).await?;
        Ok(())
    }

    pub async fn set_kyc_status(&self, user_id: &str, status: &str) -> Result<()> {
        users::Entity::update_many()
            .col_expr(users::Column::KycStatus, sea_orm::sea_query::Expr::value(status))
            .filter(users::Column::Id.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to update KYC status")?;
        Ok(())
    }

    pub async fn update_info(
        &self,
        user: users::Model,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<users::Model> {
        let mut active: users::ActiveModel = user.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(phone) = phone {
            active.phone = Set(phone);
        }
        Ok(active.update(&self.conn).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<users::Model>> {
        users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list users")
    }

    pub async fn count_investors(&self) -> Result<u64> {
        users::Entity::find()
            .filter(users::Column::Role.eq("investor"))
            .count(&self.conn)
            .await
            .context("Failed to count investors")
    }

    pub async fn total_investor_balance(&self) -> Result<i64> {
        let balances: Vec<i64> = users::Entity::find()
            .filter(users::Column::Role.eq("investor"))
            .select_only()
            .column(users::Column::Balance)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to sum investor balances")?;

        Ok(balances.into_iter().sum())
    }
}

/// Hash a password using Argon2id with default params.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
