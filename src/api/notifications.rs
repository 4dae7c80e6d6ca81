use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::principal::Investor;
use super::{ApiError, ApiResponse, AppState, NotificationListDto};

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Investor(user): Investor,
) -> Result<Json<ApiResponse<NotificationListDto>>, ApiError> {
    let notifications = state.shared.store.list_notifications(&user.id).await?;
    let unread_count = state.shared.store.unread_notification_count(&user.id).await?;

    Ok(Json(ApiResponse::success(NotificationListDto {
        notifications,
        unread_count,
    })))
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Investor(user): Investor,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    if !state.shared.store.mark_notification_read(&id, &user.id).await? {
        return Err(ApiError::not_found("Notification", &id));
    }

    Ok(Json(ApiResponse::success("Marked as read")))
}

pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    Investor(user): Investor,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let updated = state.shared.store.mark_all_notifications_read(&user.id).await?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "updated": updated
    }))))
}
