use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::principal::Investor;
use super::{ApiError, ApiResponse, AppState};
use crate::entities::transactions;

#[derive(Debug, Deserialize)]
pub struct CreateTransactionPayload {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub amount: i64,
    #[serde(default)]
    pub bank_id: String,
}

pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Investor(user): Investor,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<Json<ApiResponse<transactions::Model>>, ApiError> {
    let tx = state
        .shared
        .ledger
        .create_transaction(&user, &payload.tx_type, payload.amount, &payload.bank_id)
        .await?;

    Ok(Json(ApiResponse::success(tx)))
}

pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Investor(user): Investor,
) -> Result<Json<ApiResponse<Vec<transactions::Model>>>, ApiError> {
    let txs = state.shared.store.list_transactions(&user.id).await?;
    Ok(Json(ApiResponse::success(txs)))
}
