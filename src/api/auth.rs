use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::principal::Investor;
use super::{ApiError, ApiResponse, AppState, AuthResponse, UserDto};
use crate::auth::issue_token;
use crate::db::NewUser;
use crate::entities::users;

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackPayload {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordPayload {
    pub current_password: String,
    pub new_password: String,
}

async fn issue_for(state: &Arc<AppState>, user: &users::Model) -> Result<String, ApiError> {
    let config = state.shared.config.read().await;

    issue_token(
        &user.id,
        &user.role,
        &config.auth.jwt_secret,
        config.auth.token_ttl_days,
    )
    .map_err(|e| ApiError::internal(e.to_string()))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::validation("A valid email is required"));
    }
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Name is required"));
    }

    let min_len = state.shared.config.read().await.auth.min_password_length;
    if payload.password.len() < min_len {
        return Err(ApiError::validation(format!(
            "Password must be at least {min_len} characters"
        )));
    }

    if state.shared.store.get_user_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let user = state
        .shared
        .store
        .create_user(NewUser {
            email,
            password: Some(payload.password),
            name: payload.name.trim().to_string(),
            phone: payload.phone,
            picture: String::new(),
        })
        .await?;

    state
        .shared
        .store
        .add_notification(
            &user.id,
            "welcome",
            "Welcome",
            "Your account has been created. Complete KYC verification to start investing.",
        )
        .await?;

    let token = issue_for(&state, &user).await?;

    Ok(Json(ApiResponse::success(AuthResponse {
        token,
        user: user.into(),
    })))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let email = payload.email.trim().to_lowercase();

    // One message for unknown email and wrong password.
    let uniform = || ApiError::unauthorized("Invalid email or password");

    let user = state
        .shared
        .store
        .get_user_by_email(&email)
        .await?
        .ok_or_else(uniform)?;

    let Some(hash) = &user.password_hash else {
        return Err(ApiError::unauthorized(
            "This account uses Google sign-in",
        ));
    };

    if !state
        .shared
        .store
        .verify_user_password(hash, &payload.password)
        .await?
    {
        return Err(uniform());
    }

    let token = issue_for(&state, &user).await?;

    Ok(Json(ApiResponse::success(AuthResponse {
        token,
        user: user.into(),
    })))
}

pub async fn google_callback(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GoogleCallbackPayload>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    if payload.session_id.trim().is_empty() {
        return Err(ApiError::validation("session_id is required"));
    }

    let identity = state
        .shared
        .oauth
        .lookup(&payload.session_id)
        .await
        .map_err(|e| ApiError::identity_provider_error(e.to_string()))?;

    let email = identity.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ApiError::unauthorized("Identity provider returned no email"));
    }

    let user = match state.shared.store.get_user_by_email(&email).await? {
        Some(existing) => {
            state
                .shared
                .store
                .update_user_identity(existing, &identity.name, &identity.picture)
                .await?
        }
        None => {
            let user = state
                .shared
                .store
                .create_user(NewUser {
                    email,
                    password: None,
                    name: identity.name,
                    phone: String::new(),
                    picture: identity.picture,
                })
                .await?;

            state
                .shared
                .store
                .add_notification(
                    &user.id,
                    "welcome",
                    "Welcome",
                    "Your account has been created. Complete KYC verification to start investing.",
                )
                .await?;

            user
        }
    };

    let token = issue_for(&state, &user).await?;

    Ok(Json(ApiResponse::success(AuthResponse {
        token,
        user: user.into(),
    })))
}

pub async fn me(Investor(user): Investor) -> Json<ApiResponse<UserDto>> {
    Json(ApiResponse::success(user.into()))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Investor(user): Investor,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    let Some(hash) = user.password_hash.clone() else {
        return Err(ApiError::validation(
            "This account uses Google sign-in and has no password",
        ));
    };

    let min_len = state.shared.config.read().await.auth.min_password_length;
    if payload.new_password.len() < min_len {
        return Err(ApiError::validation(format!(
            "Password must be at least {min_len} characters"
        )));
    }

    if !state
        .shared
        .store
        .verify_user_password(&hash, &payload.current_password)
        .await?
    {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    state
        .shared
        .store
        .update_user_password(user, &payload.new_password)
        .await?;

    Ok(Json(ApiResponse::success("Password updated")))
}
