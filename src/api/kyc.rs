use axum::{
    Json,
    extract::{Multipart, State},
};
use std::sync::Arc;

use super::principal::Investor;
use super::{ApiError, ApiResponse, AppState, KycStatusDto};
use crate::entities::kyc_documents;

/// Accepts a multipart form with exactly two files, `front` and `back`.
/// A re-submission replaces the previous documents and puts the account
/// back under review.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Investor(user): Investor,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<kyc_documents::Model>>, ApiError> {
    let mut front: Option<String> = None;
    let mut back: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed upload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().unwrap_or_default().to_string();

        let side = match name.as_str() {
            "front" => "front",
            "back" => "back",
            _ => continue,
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read upload: {e}")))?;

        if bytes.is_empty() {
            return Err(ApiError::validation(format!("The {side} document is empty")));
        }

        let url = state
            .shared
            .documents
            .save_kyc(&user.id, side, &filename, &bytes)
            .await?;

        match side {
            "front" => front = Some(url),
            _ => back = Some(url),
        }
    }

    let (Some(front), Some(back)) = (front, back) else {
        return Err(ApiError::validation(
            "Both front and back documents are required",
        ));
    };

    let document = state.shared.store.submit_kyc(&user, &front, &back).await?;
    state
        .shared
        .store
        .set_user_kyc_status(&user.id, "submitted")
        .await?;

    state
        .shared
        .store
        .add_notification(
            &user.id,
            "kyc",
            "Documents received",
            "Your identity documents were received and are under review.",
        )
        .await?;

    Ok(Json(ApiResponse::success(document)))
}

pub async fn status(
    State(state): State<Arc<AppState>>,
    Investor(user): Investor,
) -> Result<Json<ApiResponse<KycStatusDto>>, ApiError> {
    let document = state.shared.store.get_kyc_for_user(&user.id).await?;

    Ok(Json(ApiResponse::success(KycStatusDto {
        kyc_status: user.kyc_status,
        document,
    })))
}
