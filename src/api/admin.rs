use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::principal::Admin;
use super::{AdminPortfolioDto, ApiError, ApiResponse, AppState, StatsDto, UserDto};
use crate::db::{BankInput, ProjectInput};
use crate::entities::{banks, kyc_documents, projects, transactions};

#[derive(Debug, Deserialize)]
pub struct ProjectPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub project_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub capacity: String,
    pub return_rate: f64,
    pub total_target: i64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub details: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "active".to_string()
}

#[derive(Debug, Deserialize)]
pub struct BankPayload {
    pub name: String,
    pub iban: String,
    pub account_holder: String,
    #[serde(default)]
    pub logo_url: String,
}

#[derive(Debug, Deserialize)]
pub struct BalancePayload {
    /// "add" or "subtract"
    pub action: String,
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct RolePayload {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UserInfoPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolvePayload {
    /// "approved" or "rejected"
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioQuery {
    pub user_id: Option<String>,
}

impl From<ProjectPayload> for ProjectInput {
    fn from(p: ProjectPayload) -> Self {
        Self {
            name: p.name,
            project_type: p.project_type,
            description: p.description,
            location: p.location,
            capacity: p.capacity,
            return_rate: p.return_rate,
            total_target: p.total_target,
            image_url: p.image_url,
            details: p.details,
            status: p.status,
        }
    }
}

impl From<BankPayload> for BankInput {
    fn from(p: BankPayload) -> Self {
        Self {
            name: p.name,
            iban: p.iban,
            account_holder: p.account_holder,
            logo_url: p.logo_url,
        }
    }
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
) -> Result<Json<ApiResponse<StatsDto>>, ApiError> {
    let store = &state.shared.store;

    Ok(Json(ApiResponse::success(StatsDto {
        total_investors: store.count_investors().await?,
        total_balance: store.total_investor_balance().await?,
        total_invested: store.total_invested().await?,
        pending_transactions: store.count_pending_transactions().await?,
    })))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.shared.store.list_users().await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(Into::into).collect(),
    )))
}

pub async fn adjust_balance(
    State(state): State<Arc<AppState>>,
    Admin(admin): Admin,
    Path(user_id): Path<String>,
    Json(payload): Json<BalancePayload>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let add = match payload.action.as_str() {
        "add" => true,
        "subtract" => false,
        _ => return Err(ApiError::validation("action must be 'add' or 'subtract'")),
    };

    let new_balance = state
        .shared
        .ledger
        .adjust_balance(&admin.id, &user_id, add, payload.amount)
        .await?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "balance": new_balance
    }))))
}

pub async fn set_role(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    Path(user_id): Path<String>,
    Json(payload): Json<RolePayload>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    if crate::auth::Role::parse(&payload.role).is_none() {
        return Err(ApiError::validation("role must be 'investor' or 'admin'"));
    }

    let user = state
        .shared
        .store
        .get_user(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", &user_id))?;

    state.shared.store.set_user_role(user, &payload.role).await?;

    Ok(Json(ApiResponse::success("Role updated")))
}

pub async fn update_user_info(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    Path(user_id): Path<String>,
    Json(payload): Json<UserInfoPayload>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .shared
        .store
        .get_user(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", &user_id))?;

    let email = match payload.email {
        Some(email) => {
            let email = email.trim().to_lowercase();
            if !email.contains('@') {
                return Err(ApiError::validation("A valid email is required"));
            }
            if email != user.email
                && state.shared.store.get_user_by_email(&email).await?.is_some()
            {
                return Err(ApiError::Conflict("Email is already registered".to_string()));
            }
            Some(email)
        }
        None => None,
    };

    let updated = state
        .shared
        .store
        .update_user_info(user, payload.name, email, payload.phone)
        .await?;

    Ok(Json(ApiResponse::success(updated.into())))
}

pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
) -> Result<Json<ApiResponse<Vec<transactions::Model>>>, ApiError> {
    let txs = state.shared.store.list_all_transactions(None).await?;
    Ok(Json(ApiResponse::success(txs)))
}

pub async fn resolve_transaction(
    State(state): State<Arc<AppState>>,
    Admin(admin): Admin,
    Path(id): Path<String>,
    Json(payload): Json<ResolvePayload>,
) -> Result<Json<ApiResponse<transactions::Model>>, ApiError> {
    let approve = match payload.status.as_str() {
        "approved" => true,
        "rejected" => false,
        _ => {
            return Err(ApiError::validation(
                "status must be 'approved' or 'rejected'",
            ));
        }
    };

    let tx = state
        .shared
        .ledger
        .resolve_transaction(&admin.id, &id, approve)
        .await?;

    Ok(Json(ApiResponse::success(tx)))
}

pub async fn list_portfolios(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    Query(query): Query<PortfolioQuery>,
) -> Result<Json<ApiResponse<Vec<AdminPortfolioDto>>>, ApiError> {
    let entries = state
        .shared
        .store
        .list_all_portfolios(query.user_id.as_deref())
        .await?;

    let users = state.shared.store.list_users().await?;
    let owners: HashMap<String, (String, String)> = users
        .into_iter()
        .map(|u| (u.id, (u.name, u.email)))
        .collect();

    let joined = entries
        .into_iter()
        .map(|entry| {
            let (user_name, user_email) = owners
                .get(&entry.user_id)
                .cloned()
                .unwrap_or_default();
            AdminPortfolioDto {
                entry,
                user_name,
                user_email,
            }
        })
        .collect();

    Ok(Json(ApiResponse::success(joined)))
}

pub async fn list_kyc(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
) -> Result<Json<ApiResponse<Vec<kyc_documents::Model>>>, ApiError> {
    let submissions = state.shared.store.list_kyc_submissions().await?;
    Ok(Json(ApiResponse::success(submissions)))
}

async fn review_kyc(
    state: &Arc<AppState>,
    id: &str,
    approve: bool,
) -> Result<(), ApiError> {
    let document = state
        .shared
        .store
        .get_kyc(id)
        .await?
        .ok_or_else(|| ApiError::not_found("KYC submission", id))?;

    let user_id = document.user_id.clone();
    let status = if approve { "approved" } else { "rejected" };

    state.shared.store.set_kyc_document_status(document, status).await?;
    state.shared.store.set_user_kyc_status(&user_id, status).await?;

    let (title, message) = if approve {
        (
            "Identity verified",
            "Your identity verification was approved. You can now invest.",
        )
    } else {
        (
            "Verification rejected",
            "Your identity verification was rejected. Please re-submit your documents.",
        )
    };

    state
        .shared
        .store
        .add_notification(&user_id, "kyc", title, message)
        .await?;

    Ok(())
}

pub async fn approve_kyc(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    review_kyc(&state, &id, true).await?;
    Ok(Json(ApiResponse::success("KYC approved")))
}

pub async fn reject_kyc(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    review_kyc(&state, &id, false).await?;
    Ok(Json(ApiResponse::success("KYC rejected")))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    Json(payload): Json<ProjectPayload>,
) -> Result<Json<ApiResponse<projects::Model>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Project name is required"));
    }
    if payload.total_target <= 0 {
        return Err(ApiError::validation("total_target must be positive"));
    }

    let project = state.shared.store.create_project(payload.into()).await?;
    Ok(Json(ApiResponse::success(project)))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    Path(id): Path<String>,
    Json(payload): Json<ProjectPayload>,
) -> Result<Json<ApiResponse<projects::Model>>, ApiError> {
    let project = state
        .shared
        .store
        .get_project(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project", &id))?;

    let updated = state
        .shared
        .store
        .update_project(project, payload.into())
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

pub async fn create_bank(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    Json(payload): Json<BankPayload>,
) -> Result<Json<ApiResponse<banks::Model>>, ApiError> {
    if payload.name.trim().is_empty() || payload.iban.trim().is_empty() {
        return Err(ApiError::validation("Bank name and IBAN are required"));
    }

    let bank = state.shared.store.create_bank(payload.into()).await?;
    Ok(Json(ApiResponse::success(bank)))
}

pub async fn update_bank(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    Path(id): Path<String>,
    Json(payload): Json<BankPayload>,
) -> Result<Json<ApiResponse<banks::Model>>, ApiError> {
    let bank = state
        .shared
        .store
        .get_bank(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Bank", &id))?;

    let updated = state.shared.store.update_bank(bank, payload.into()).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn delete_bank(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    if !state.shared.store.deactivate_bank(&id).await? {
        return Err(ApiError::not_found("Bank", &id));
    }

    Ok(Json(ApiResponse::success("Bank deactivated")))
}
