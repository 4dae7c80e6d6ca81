use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, UsdRateDto};
use crate::entities::projects;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub project_type: Option<String>,
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<projects::Model>>>, ApiError> {
    // "all" is the client's way of asking for no filter.
    let project_type = query
        .project_type
        .filter(|t| !t.eq_ignore_ascii_case("all"))
        .map(|t| t.to_uppercase());

    let projects = state
        .shared
        .store
        .list_projects(project_type.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(projects)))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<projects::Model>>, ApiError> {
    let project = state
        .shared
        .store
        .get_project(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project", &id))?;

    Ok(Json(ApiResponse::success(project)))
}

/// Current USD rate and the fixed share price. The rate is stable within
/// the cache freshness window.
pub async fn usd_rate(State(state): State<Arc<AppState>>) -> Json<ApiResponse<UsdRateDto>> {
    let rate = state.shared.fx.current_rate().await;
    Json(ApiResponse::success(UsdRateDto::new(rate)))
}
