//! Accounting core: investments, sales, wallet transactions and admin
//! balance adjustments. Every multi-write operation runs inside a single
//! database transaction so no intermediate state is ever observable.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait, sea_query::Expr,
};
use thiserror::Error;
use tracing::info;

use crate::db::{new_id, repositories::notification};
use crate::entities::{portfolios, projects, transactions, users};

/// Price of a single share, in whole currency units.
pub const SHARE_PRICE: i64 = 25_000;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("KYC verification is required before investing")]
    KycNotApproved,
    #[error("Minimum investment is {SHARE_PRICE}")]
    BelowMinimum,
    #[error("Amount must be a multiple of the share price ({SHARE_PRICE})")]
    NotShareMultiple,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("Project not found")]
    ProjectNotFound,
    #[error("Portfolio entry not found")]
    PortfolioNotFound,
    #[error("Transaction not found")]
    TransactionNotFound,
    #[error("Transaction has already been resolved")]
    AlreadyResolved,
    #[error("Invalid transaction type")]
    InvalidTransactionType,
    #[error("Invalid amount")]
    InvalidAmount,
    #[error("User not found")]
    UserNotFound,
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Return tier decided by share count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnTier {
    pub rate_pct: f64,
    pub usd_based: bool,
}

/// Highest threshold wins.
#[must_use]
pub const fn return_tier(shares: i32) -> ReturnTier {
    if shares >= 10 {
        ReturnTier { rate_pct: 8.0, usd_based: true }
    } else if shares >= 5 {
        ReturnTier { rate_pct: 7.0, usd_based: true }
    } else {
        ReturnTier { rate_pct: 7.0, usd_based: false }
    }
}

/// Monthly return for an investment. USD-linked tiers convert through the
/// rate captured at purchase so later rate movement never changes the
/// figure.
#[must_use]
pub fn monthly_return(amount: i64, tier: ReturnTier, usd_rate: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let amount = amount as f64;

    let raw = if tier.usd_based {
        amount / usd_rate * tier.rate_pct / 100.0 * usd_rate
    } else {
        amount * tier.rate_pct / 100.0
    };

    round2(raw)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Clone)]
pub struct LedgerService {
    conn: DatabaseConnection,
}

impl LedgerService {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Buy shares in a project. `usd_rate` is the cached FX rate at the
    /// time of the request; it is stored on the entry for USD-linked tiers.
    pub async fn invest(
        &self,
        user: &users::Model,
        project_id: &str,
        amount: i64,
        usd_rate: f64,
    ) -> Result<portfolios::Model> {
        if user.kyc_status != "approved" {
            return Err(LedgerError::KycNotApproved);
        }
        if amount < SHARE_PRICE {
            return Err(LedgerError::BelowMinimum);
        }
        if amount % SHARE_PRICE != 0 {
            return Err(LedgerError::NotShareMultiple);
        }
        if user.balance < amount {
            return Err(LedgerError::InsufficientBalance);
        }

        let project = projects::Entity::find_by_id(project_id)
            .one(&self.conn)
            .await?
            .ok_or(LedgerError::ProjectNotFound)?;

        #[allow(clippy::cast_possible_truncation)]
        let shares = (amount / SHARE_PRICE) as i32;
        let tier = return_tier(shares);
        let monthly = monthly_return(amount, tier, usd_rate);

        let entry = portfolios::ActiveModel {
            id: Set(new_id("pf")),
            user_id: Set(user.id.clone()),
            project_id: Set(project.id.clone()),
            project_name: Set(project.name.clone()),
            project_type: Set(project.project_type.clone()),
            amount: Set(amount),
            shares: Set(shares),
            monthly_return: Set(monthly),
            return_rate: Set(tier.rate_pct),
            usd_based: Set(tier.usd_based),
            usd_rate_at_purchase: Set(tier.usd_based.then_some(usd_rate)),
            purchase_date: Set(chrono::Utc::now().to_rfc3339()),
            status: Set("active".to_string()),
        };

        let txn = self.conn.begin().await?;

        users::Entity::update_many()
            .col_expr(users::Column::Balance, Expr::col(users::Column::Balance).sub(amount))
            .filter(users::Column::Id.eq(&user.id))
            .exec(&txn)
            .await?;

        let entry = entry.insert(&txn).await?;

        projects::Entity::update_many()
            .col_expr(
                projects::Column::FundedAmount,
                Expr::col(projects::Column::FundedAmount).add(amount),
            )
            .col_expr(
                projects::Column::InvestorsCount,
                Expr::col(projects::Column::InvestorsCount).add(1),
            )
            .filter(projects::Column::Id.eq(&project.id))
            .exec(&txn)
            .await?;

        notification::push(
            &txn,
            &user.id,
            "investment",
            "Investment completed",
            &format!(
                "You bought {shares} share(s) in {} for {amount}.",
                project.name
            ),
        )
        .await?;

        txn.commit().await?;

        info!(
            user = %user.id,
            project = %project.id,
            amount,
            shares,
            "Investment recorded"
        );

        Ok(entry)
    }

    /// Sell a portfolio entry back. Credits the original invested amount;
    /// there is no valuation step. Project funding totals are left as-is.
    pub async fn sell(&self, user: &users::Model, portfolio_id: &str) -> Result<i64> {
        let entry = portfolios::Entity::find_by_id(portfolio_id)
            .filter(portfolios::Column::UserId.eq(&user.id))
            .one(&self.conn)
            .await?
            .ok_or(LedgerError::PortfolioNotFound)?;

        let amount = entry.amount;
        let project_name = entry.project_name.clone();

        let txn = self.conn.begin().await?;

        users::Entity::update_many()
            .col_expr(users::Column::Balance, Expr::col(users::Column::Balance).add(amount))
            .filter(users::Column::Id.eq(&user.id))
            .exec(&txn)
            .await?;

        portfolios::Entity::delete_by_id(&entry.id).exec(&txn).await?;

        notification::push(
            &txn,
            &user.id,
            "sale",
            "Investment sold",
            &format!("Your investment in {project_name} was sold for {amount}."),
        )
        .await?;

        txn.commit().await?;

        info!(user = %user.id, portfolio = portfolio_id, amount, "Investment sold");

        Ok(amount)
    }

    /// Record a deposit or withdrawal request. Never touches the balance;
    /// the effect is applied at approval. Withdrawals are pre-checked
    /// against the current balance but the amount is not held.
    pub async fn create_transaction(
        &self,
        user: &users::Model,
        tx_type: &str,
        amount: i64,
        bank_id: &str,
    ) -> Result<transactions::Model> {
        if tx_type != "deposit" && tx_type != "withdrawal" {
            return Err(LedgerError::InvalidTransactionType);
        }
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if tx_type == "withdrawal" && user.balance < amount {
            return Err(LedgerError::InsufficientBalance);
        }

        let model = transactions::ActiveModel {
            id: Set(new_id("tx")),
            user_id: Set(user.id.clone()),
            user_name: Set(user.name.clone()),
            tx_type: Set(tx_type.to_string()),
            amount: Set(amount),
            bank_id: Set(bank_id.to_string()),
            status: Set("pending".to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            approved_by: Set(None),
        };

        Ok(model.insert(&self.conn).await?)
    }

    /// Resolve a pending transaction. The `pending` status is the guard
    /// against double application: anything else is rejected untouched.
    /// An approved withdrawal re-validates the balance; when funds are
    /// gone the transaction flips to `rejected` instead.
    pub async fn resolve_transaction(
        &self,
        admin_id: &str,
        transaction_id: &str,
        approve: bool,
    ) -> Result<transactions::Model> {
        let tx = transactions::Entity::find_by_id(transaction_id)
            .one(&self.conn)
            .await?
            .ok_or(LedgerError::TransactionNotFound)?;

        if tx.status != "pending" {
            return Err(LedgerError::AlreadyResolved);
        }

        if !approve {
            return self.mark_resolved(tx, "rejected", admin_id, "Your request was rejected.").await;
        }

        if tx.tx_type == "deposit" {
            let txn = self.conn.begin().await?;

            users::Entity::update_many()
                .col_expr(
                    users::Column::Balance,
                    Expr::col(users::Column::Balance).add(tx.amount),
                )
                .filter(users::Column::Id.eq(&tx.user_id))
                .exec(&txn)
                .await?;

            let updated = set_status(&txn, tx, "approved", admin_id).await?;

            notification::push(
                &txn,
                &updated.user_id,
                "transaction",
                "Deposit approved",
                &format!("Your deposit of {} was approved.", updated.amount),
            )
            .await?;

            txn.commit().await?;
            return Ok(updated);
        }

        // Withdrawal: the amount was not held at request time, so the
        // balance must be re-checked now.
        let user = users::Entity::find_by_id(&tx.user_id)
            .one(&self.conn)
            .await?
            .ok_or(LedgerError::UserNotFound)?;

        if user.balance < tx.amount {
            self.mark_resolved(
                tx,
                "rejected",
                admin_id,
                "Your withdrawal was rejected: insufficient balance.",
            )
            .await?;
            return Err(LedgerError::InsufficientBalance);
        }

        let txn = self.conn.begin().await?;

        users::Entity::update_many()
            .col_expr(
                users::Column::Balance,
                Expr::col(users::Column::Balance).sub(tx.amount),
            )
            .filter(users::Column::Id.eq(&tx.user_id))
            .exec(&txn)
            .await?;

        let updated = set_status(&txn, tx, "approved", admin_id).await?;

        notification::push(
            &txn,
            &updated.user_id,
            "transaction",
            "Withdrawal approved",
            &format!("Your withdrawal of {} was approved.", updated.amount),
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    async fn mark_resolved(
        &self,
        tx: transactions::Model,
        status: &str,
        admin_id: &str,
        message: &str,
    ) -> Result<transactions::Model> {
        let txn = self.conn.begin().await?;

        let updated = set_status(&txn, tx, status, admin_id).await?;

        notification::push(
            &txn,
            &updated.user_id,
            "transaction",
            "Request rejected",
            message,
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Direct balance adjustment by an admin. Bypasses the approval
    /// workflow but leaves an audit trail: a transaction pre-marked
    /// `approved` plus a notification.
    pub async fn adjust_balance(
        &self,
        admin_id: &str,
        user_id: &str,
        add: bool,
        amount: i64,
    ) -> Result<i64> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let user = users::Entity::find_by_id(user_id)
            .one(&self.conn)
            .await?
            .ok_or(LedgerError::UserNotFound)?;

        if !add && user.balance < amount {
            return Err(LedgerError::InsufficientBalance);
        }

        let new_balance = if add { user.balance + amount } else { user.balance - amount };

        let audit = transactions::ActiveModel {
            id: Set(new_id("tx")),
            user_id: Set(user.id.clone()),
            user_name: Set(user.name.clone()),
            tx_type: Set(if add { "deposit" } else { "withdrawal" }.to_string()),
            amount: Set(amount),
            bank_id: Set("admin".to_string()),
            status: Set("approved".to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            approved_by: Set(Some(admin_id.to_string())),
        };

        let txn = self.conn.begin().await?;

        users::Entity::update_many()
            .col_expr(users::Column::Balance, Expr::value(new_balance))
            .filter(users::Column::Id.eq(&user.id))
            .exec(&txn)
            .await?;

        audit.insert(&txn).await?;

        notification::push(
            &txn,
            &user.id,
            "balance",
            "Balance updated",
            &format!(
                "Your balance was {} by {amount}.",
                if add { "increased" } else { "decreased" }
            ),
        )
        .await?;

        txn.commit().await?;

        info!(admin = admin_id, user = user_id, amount, add, "Balance adjusted");

        Ok(new_balance)
    }
}

async fn set_status<C: sea_orm::ConnectionTrait>(
    conn: &C,
    tx: transactions::Model,
    status: &str,
    admin_id: &str,
) -> Result<transactions::Model> {
    let mut active: transactions::ActiveModel = tx.into();
    active.status = Set(status.to_string());
    active.approved_by = Set(Some(admin_id.to_string()));
    Ok(active.update(conn).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(return_tier(1), ReturnTier { rate_pct: 7.0, usd_based: false });
        assert_eq!(return_tier(4), ReturnTier { rate_pct: 7.0, usd_based: false });
        assert_eq!(return_tier(5), ReturnTier { rate_pct: 7.0, usd_based: true });
        assert_eq!(return_tier(9), ReturnTier { rate_pct: 7.0, usd_based: true });
        assert_eq!(return_tier(10), ReturnTier { rate_pct: 8.0, usd_based: true });
        assert_eq!(return_tier(40), ReturnTier { rate_pct: 8.0, usd_based: true });
    }

    #[test]
    fn local_return_is_flat_percentage() {
        let tier = return_tier(2);
        assert_eq!(monthly_return(50_000, tier, 38.0), 3_500.0);
    }

    #[test]
    fn usd_linked_return_round_trips_through_the_rate() {
        let tier = return_tier(10);
        // 250_000 * 8% = 20_000, whatever the rate is.
        assert_eq!(monthly_return(250_000, tier, 38.0), 20_000.0);
        assert_eq!(monthly_return(250_000, tier, 41.1234), 20_000.0);
    }

    #[test]
    fn mid_tier_return() {
        let tier = return_tier(5);
        assert_eq!(monthly_return(125_000, tier, 38.0), 8_750.0);
    }

    #[test]
    fn returns_are_rounded_to_cents() {
        let tier = ReturnTier { rate_pct: 7.0, usd_based: false };
        assert_eq!(monthly_return(33_333, tier, 38.0), 2_333.31);
    }
}
