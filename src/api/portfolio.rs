use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::principal::Investor;
use super::{ApiError, ApiResponse, AppState, PortfolioDto};
use crate::entities::portfolios;

#[derive(Debug, Deserialize)]
pub struct InvestPayload {
    pub project_id: String,
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct SellPayload {
    pub portfolio_id: String,
}

pub async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    Investor(user): Investor,
) -> Result<Json<ApiResponse<PortfolioDto>>, ApiError> {
    let entries = state.shared.store.list_portfolio(&user.id).await?;

    let total_invested = entries.iter().map(|e| e.amount).sum();
    let total_monthly_return = entries.iter().map(|e| e.monthly_return).sum();

    Ok(Json(ApiResponse::success(PortfolioDto {
        entries,
        total_invested,
        total_monthly_return,
        balance: user.balance,
    })))
}

pub async fn invest(
    State(state): State<Arc<AppState>>,
    Investor(user): Investor,
    Json(payload): Json<InvestPayload>,
) -> Result<Json<ApiResponse<portfolios::Model>>, ApiError> {
    let usd_rate = state.shared.fx.current_rate().await;

    let entry = state
        .shared
        .ledger
        .invest(&user, &payload.project_id, payload.amount, usd_rate)
        .await?;

    Ok(Json(ApiResponse::success(entry)))
}

pub async fn sell(
    State(state): State<Arc<AppState>>,
    Investor(user): Investor,
    Json(payload): Json<SellPayload>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let amount = state
        .shared
        .ledger
        .sell(&user, &payload.portfolio_id)
        .await?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "refunded": amount
    }))))
}
