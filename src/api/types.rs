use serde::Serialize;

use crate::entities::{kyc_documents, portfolios, users};
use crate::services::ledger::SHARE_PRICE;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// User as exposed to clients. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub picture: String,
    pub role: String,
    pub kyc_status: String,
    pub balance: i64,
    pub created_at: String,
}

impl From<users::Model> for UserDto {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            picture: user.picture,
            role: user.role,
            kyc_status: user.kyc_status,
            balance: user.balance,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct PortfolioDto {
    pub entries: Vec<portfolios::Model>,
    pub total_invested: i64,
    pub total_monthly_return: f64,
    pub balance: i64,
}

#[derive(Debug, Serialize)]
pub struct UsdRateDto {
    pub rate: f64,
    pub share_price: i64,
}

impl UsdRateDto {
    #[must_use]
    pub const fn new(rate: f64) -> Self {
        Self {
            rate,
            share_price: SHARE_PRICE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationListDto {
    pub notifications: Vec<crate::entities::notifications::Model>,
    pub unread_count: u64,
}

#[derive(Debug, Serialize)]
pub struct KycStatusDto {
    pub kyc_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<kyc_documents::Model>,
}

#[derive(Debug, Serialize)]
pub struct StatsDto {
    pub total_investors: u64,
    pub total_balance: i64,
    pub total_invested: i64,
    pub pending_transactions: u64,
}

/// Portfolio entry with its owner, for the admin console.
#[derive(Debug, Serialize)]
pub struct AdminPortfolioDto {
    #[serde(flatten)]
    pub entry: portfolios::Model,
    pub user_name: String,
    pub user_email: String,
}
