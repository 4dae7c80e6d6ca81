use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// `GET /api/health/live`
///
/// Lightweight liveness probe to indicate the API process is running.
pub async fn live() -> impl IntoResponse {
    Json(ApiResponse::success(HealthResponse { status: "alive" }))
}

/// `GET /api/health/ready`
///
/// Readiness probe that checks database connectivity.
pub async fn ready(State(state): State<Arc<AppState>>) -> Response {
    if state.store().ping().await.is_ok() {
        (
            StatusCode::OK,
            Json(ApiResponse::success(HealthResponse { status: "ready" })),
        )
            .into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::<()>::error("database unavailable")),
        )
            .into_response()
    }
}
