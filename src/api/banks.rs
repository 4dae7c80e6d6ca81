use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::entities::banks;

pub async fn list_banks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<banks::Model>>>, ApiError> {
    let banks = state.shared.store.list_banks().await?;
    Ok(Json(ApiResponse::success(banks)))
}
