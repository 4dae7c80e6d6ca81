use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub mod admin;
pub mod auth;
mod banks;
mod error;
mod health;
pub mod kyc;
mod notifications;
pub mod portfolio;
pub mod principal;
mod projects;
mod transactions;
mod types;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

pub async fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState { shared })
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (uploads_path, cors_origins) = {
        let config = state.shared.config.read().await;
        (
            config.uploads.path.clone(),
            config.server.cors_allowed_origins.clone(),
        )
    };

    let api_router = Router::new()
        // Public
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/google-callback", post(auth::google_callback))
        .route("/projects", get(projects::list_projects))
        .route("/projects/{id}", get(projects::get_project))
        .route("/banks", get(banks::list_banks))
        .route("/usd-rate", get(projects::usd_rate))
        // Investor
        .route("/auth/me", get(auth::me))
        .route("/auth/change-password", post(auth::change_password))
        .route("/portfolio", get(portfolio::get_portfolio))
        .route("/portfolio/invest", post(portfolio::invest))
        .route("/portfolio/sell", post(portfolio::sell))
        .route("/transactions", post(transactions::create_transaction))
        .route("/transactions", get(transactions::list_transactions))
        .route("/kyc/upload", post(kyc::upload))
        .route("/kyc/status", get(kyc::status))
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        // Admin
        .route("/admin/stats", get(admin::stats))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}/balance", put(admin::adjust_balance))
        .route("/admin/users/{id}/role", put(admin::set_role))
        .route("/admin/users/{id}/info", put(admin::update_user_info))
        .route("/admin/transactions", get(admin::list_transactions))
        .route("/admin/transactions/{id}", put(admin::resolve_transaction))
        .route("/admin/portfolios", get(admin::list_portfolios))
        .route("/admin/kyc", get(admin::list_kyc))
        .route("/admin/kyc/{id}/approve", post(admin::approve_kyc))
        .route("/admin/kyc/{id}/reject", post(admin::reject_kyc))
        .route("/admin/projects", post(admin::create_project))
        .route("/admin/projects/{id}", put(admin::update_project))
        .route("/admin/banks", post(admin::create_bank))
        .route("/admin/banks/{id}", put(admin::update_bank))
        .route("/admin/banks/{id}", delete(admin::delete_bank))
        .nest_service("/uploads", ServeDir::new(uploads_path))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
