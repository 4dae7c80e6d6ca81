//! Typed request principals. The token is decoded and the account loaded
//! once, in the extractor; handlers state the capability they need in
//! their signature instead of checking roles inline.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::auth::{Role, verify_token};
use crate::entities::users;

/// Any authenticated account. Admins hold this capability too.
pub struct Investor(pub users::Model);

/// An authenticated account with the admin role.
pub struct Admin(pub users::Model);

async fn authenticate(parts: &Parts, state: &Arc<AppState>) -> Result<users::Model, ApiError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Invalid authorization header"))?;

    let secret = {
        let config = state.shared.config.read().await;
        config.auth.jwt_secret.clone()
    };

    let claims = verify_token(token, &secret)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    state
        .shared
        .store
        .get_user(&claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))
}

impl FromRequestParts<Arc<AppState>> for Investor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        Ok(Self(user))
    }
}

impl FromRequestParts<Arc<AppState>> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;

        if Role::parse(&user.role) != Some(Role::Admin) {
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }

        Ok(Self(user))
    }
}
