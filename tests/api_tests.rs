use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use voltfund::api;
use voltfund::config::Config;
use voltfund::state::SharedState;

/// Seeded admin credentials (must match the initial migration).
const ADMIN_EMAIL: &str = "admin@voltfund.local";
const ADMIN_PASSWORD: &str = "admin123";

const MULTIPART_BOUNDARY: &str = "----voltfund-test-boundary";

async fn spawn_app() -> (Router, tempfile::TempDir) {
    let uploads = tempfile::tempdir().expect("Failed to create upload dir");

    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.fx.refresh_enabled = false;
    config.uploads.path = uploads.path().to_string_lossy().to_string();

    let shared = SharedState::new(config)
        .await
        .expect("Failed to create app state");
    let state = api::create_app_state(std::sync::Arc::new(shared)).await;

    (api::router(state).await, uploads)
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn register(app: &Router, email: &str) -> (String, String) {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": "hunter22",
            "name": "Test Investor",
            "phone": "+90 555 000 0000"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();
    (token, user_id)
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn fund(app: &Router, admin: &str, user_id: &str, amount: i64) {
    let (status, body) = request(
        app,
        "PUT",
        &format!("/api/admin/users/{user_id}/balance"),
        Some(admin),
        Some(serde_json::json!({ "action": "add", "amount": amount })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "funding failed: {body}");
}

fn multipart_body() -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename) in [("front", "front.jpg"), ("back", "back.jpg")] {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
        body.extend_from_slice(b"fake-jpeg-bytes");
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// Upload documents for the user and approve them as admin.
async fn approve_kyc(app: &Router, token: &str, admin: &str) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/kyc/upload")
                .header("Authorization", format!("Bearer {token}"))
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
                )
                .body(Body::from(multipart_body()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let document_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = request(
        app,
        "POST",
        &format!("/api/admin/kyc/{document_id}/approve"),
        Some(admin),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK, "kyc approval failed: {body}");
}

async fn first_project_id(app: &Router) -> String {
    let (status, body) = request(app, "GET", "/api/projects", None, None).await;
    assert_eq!(status, StatusCode::OK);
    body["data"][0]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_probes() {
    let (app, _uploads) = spawn_app().await;

    let (status, body) = request(&app, "GET", "/api/health/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "alive");

    let (status, body) = request(&app, "GET", "/api/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ready");
}

#[tokio::test]
async fn register_login_and_me() {
    let (app, _uploads) = spawn_app().await;

    let (token, _) = register(&app, "alice@example.com").await;

    // Duplicate email is rejected.
    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "email": "alice@example.com",
            "password": "hunter22",
            "name": "Alice Again"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Wrong password and unknown email fail the same way.
    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({
            "email": "alice@example.com",
            "password": "wrong-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({
            "email": "nobody@example.com",
            "password": "hunter22"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["kyc_status"], "pending");
    assert_eq!(body["data"]["balance"], 0);
    assert!(body["data"].get("password_hash").is_none());

    let (status, _) = request(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(&app, "GET", "/api/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invest_requires_approved_kyc() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;
    let (token, user_id) = register(&app, "kycless@example.com").await;

    fund(&app, &admin, &user_id, 300_000).await;
    let project_id = first_project_id(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/portfolio/invest",
        Some(&token),
        Some(serde_json::json!({ "project_id": project_id, "amount": 250_000 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("KYC"));
}

#[tokio::test]
async fn invest_worked_example() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;
    let (token, user_id) = register(&app, "bob@example.com").await;

    approve_kyc(&app, &token, &admin).await;
    fund(&app, &admin, &user_id, 300_000).await;

    let project_id = first_project_id(&app).await;
    let (_, before) = request(&app, "GET", &format!("/api/projects/{project_id}"), None, None).await;
    let funded_before = before["data"]["funded_amount"].as_i64().unwrap();
    let investors_before = before["data"]["investors_count"].as_i64().unwrap();

    let (status, body) = request(
        &app,
        "POST",
        "/api/portfolio/invest",
        Some(&token),
        Some(serde_json::json!({ "project_id": project_id, "amount": 250_000 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "invest failed: {body}");
    let entry = &body["data"];
    assert_eq!(entry["shares"], 10);
    assert_eq!(entry["amount"], 250_000);
    assert_eq!(entry["return_rate"], 8.0);
    assert_eq!(entry["usd_based"], true);
    assert_eq!(entry["monthly_return"], 20_000.0);
    assert!(entry["usd_rate_at_purchase"].as_f64().unwrap() > 0.0);

    let (_, me) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(me["data"]["balance"], 50_000);

    let (_, after) = request(&app, "GET", &format!("/api/projects/{project_id}"), None, None).await;
    assert_eq!(
        after["data"]["funded_amount"].as_i64().unwrap(),
        funded_before + 250_000
    );
    assert_eq!(
        after["data"]["investors_count"].as_i64().unwrap(),
        investors_before + 1
    );

    let (_, portfolio) = request(&app, "GET", "/api/portfolio", Some(&token), None).await;
    assert_eq!(portfolio["data"]["entries"].as_array().unwrap().len(), 1);
    assert_eq!(portfolio["data"]["total_invested"], 250_000);
    assert_eq!(portfolio["data"]["balance"], 50_000);
}

#[tokio::test]
async fn invest_validation_rules() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;
    let (token, user_id) = register(&app, "val@example.com").await;

    approve_kyc(&app, &token, &admin).await;
    fund(&app, &admin, &user_id, 100_000).await;
    let project_id = first_project_id(&app).await;

    // Below the single-share minimum.
    let (status, body) = request(
        &app,
        "POST",
        "/api/portfolio/invest",
        Some(&token),
        Some(serde_json::json!({ "project_id": project_id, "amount": 20_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Minimum"));

    // Not a multiple of the share price: rejected, never rounded.
    let (status, _) = request(
        &app,
        "POST",
        "/api/portfolio/invest",
        Some(&token),
        Some(serde_json::json!({ "project_id": project_id, "amount": 30_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // More than the balance.
    let (status, body) = request(
        &app,
        "POST",
        "/api/portfolio/invest",
        Some(&token),
        Some(serde_json::json!({ "project_id": project_id, "amount": 125_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("balance"));

    // Unknown project.
    let (status, _) = request(
        &app,
        "POST",
        "/api/portfolio/invest",
        Some(&token),
        Some(serde_json::json!({ "project_id": "prj_missing", "amount": 25_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Nothing was booked.
    let (_, me) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(me["data"]["balance"], 100_000);
}

#[tokio::test]
async fn return_tiers_by_share_count() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;
    let (token, user_id) = register(&app, "tiers@example.com").await;

    approve_kyc(&app, &token, &admin).await;
    fund(&app, &admin, &user_id, 500_000).await;
    let project_id = first_project_id(&app).await;

    // One share: local currency tier.
    let (_, body) = request(
        &app,
        "POST",
        "/api/portfolio/invest",
        Some(&token),
        Some(serde_json::json!({ "project_id": project_id, "amount": 25_000 })),
    )
    .await;
    assert_eq!(body["data"]["shares"], 1);
    assert_eq!(body["data"]["return_rate"], 7.0);
    assert_eq!(body["data"]["usd_based"], false);
    assert!(body["data"]["usd_rate_at_purchase"].is_null());
    assert_eq!(body["data"]["monthly_return"], 1_750.0);

    // Five shares: USD-linked at the same rate.
    let (_, body) = request(
        &app,
        "POST",
        "/api/portfolio/invest",
        Some(&token),
        Some(serde_json::json!({ "project_id": project_id, "amount": 125_000 })),
    )
    .await;
    assert_eq!(body["data"]["shares"], 5);
    assert_eq!(body["data"]["return_rate"], 7.0);
    assert_eq!(body["data"]["usd_based"], true);
    assert_eq!(body["data"]["monthly_return"], 8_750.0);
}

#[tokio::test]
async fn sell_restores_balance_and_removes_entry() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;
    let (token, user_id) = register(&app, "seller@example.com").await;

    approve_kyc(&app, &token, &admin).await;
    fund(&app, &admin, &user_id, 50_000).await;
    let project_id = first_project_id(&app).await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/portfolio/invest",
        Some(&token),
        Some(serde_json::json!({ "project_id": project_id, "amount": 50_000 })),
    )
    .await;
    let entry_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = request(
        &app,
        "POST",
        "/api/portfolio/sell",
        Some(&token),
        Some(serde_json::json!({ "portfolio_id": entry_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["refunded"], 50_000);

    let (_, me) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(me["data"]["balance"], 50_000);

    let (_, portfolio) = request(&app, "GET", "/api/portfolio", Some(&token), None).await;
    assert!(portfolio["data"]["entries"].as_array().unwrap().is_empty());

    // Selling it twice is a not-found.
    let (status, _) = request(
        &app,
        "POST",
        "/api/portfolio/sell",
        Some(&token),
        Some(serde_json::json!({ "portfolio_id": entry_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn withdrawal_lifecycle() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;
    let (token, user_id) = register(&app, "withdraw@example.com").await;

    fund(&app, &admin, &user_id, 10_000).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/transactions",
        Some(&token),
        Some(serde_json::json!({ "type": "withdrawal", "amount": 5_000, "bank_id": "bank_x" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let tx_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "pending");

    // Creation never touches the balance.
    let (_, me) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(me["data"]["balance"], 10_000);

    // Approval debits exactly once.
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/admin/transactions/{tx_id}"),
        Some(&admin),
        Some(serde_json::json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "approved");

    let (_, me) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(me["data"]["balance"], 5_000);

    // Resolving a resolved transaction is rejected with no side effect.
    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/admin/transactions/{tx_id}"),
        Some(&admin),
        Some(serde_json::json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, me) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(me["data"]["balance"], 5_000);
}

#[tokio::test]
async fn withdrawal_rejected_when_funds_are_gone_at_approval() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;
    let (token, user_id) = register(&app, "drained@example.com").await;

    fund(&app, &admin, &user_id, 10_000).await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/transactions",
        Some(&token),
        Some(serde_json::json!({ "type": "withdrawal", "amount": 10_000, "bank_id": "bank_x" })),
    )
    .await;
    let tx_id = body["data"]["id"].as_str().unwrap().to_string();

    // The amount was not held, so the balance can drain in the meantime.
    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/admin/users/{user_id}/balance"),
        Some(&admin),
        Some(serde_json::json!({ "action": "subtract", "amount": 6_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/admin/transactions/{tx_id}"),
        Some(&admin),
        Some(serde_json::json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The transaction flipped to rejected, the balance is untouched.
    let (_, me) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(me["data"]["balance"], 4_000);

    let (_, txs) = request(&app, "GET", "/api/transactions", Some(&token), None).await;
    let tx = txs["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == tx_id.as_str())
        .unwrap();
    assert_eq!(tx["status"], "rejected");

    // And it cannot be resolved again.
    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/admin/transactions/{tx_id}"),
        Some(&admin),
        Some(serde_json::json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn deposit_credits_on_approval_only() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;
    let (token, _) = register(&app, "depositor@example.com").await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/transactions",
        Some(&token),
        Some(serde_json::json!({ "type": "deposit", "amount": 1_000, "bank_id": "bank_x" })),
    )
    .await;
    let tx_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, me) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(me["data"]["balance"], 0);

    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/admin/transactions/{tx_id}"),
        Some(&admin),
        Some(serde_json::json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, me) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(me["data"]["balance"], 1_000);
}

#[tokio::test]
async fn rejected_deposit_never_credits() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;
    let (token, _) = register(&app, "rejected@example.com").await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/transactions",
        Some(&token),
        Some(serde_json::json!({ "type": "deposit", "amount": 1_000, "bank_id": "bank_x" })),
    )
    .await;
    let tx_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/admin/transactions/{tx_id}"),
        Some(&admin),
        Some(serde_json::json!({ "status": "rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "rejected");

    let (_, me) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(me["data"]["balance"], 0);
}

#[tokio::test]
async fn usd_rate_is_public_and_stable() {
    let (app, _uploads) = spawn_app().await;

    let (status, first) = request(&app, "GET", "/api/usd-rate", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["share_price"], 25_000);
    assert!(first["data"]["rate"].as_f64().unwrap() > 0.0);

    let (_, second) = request(&app, "GET", "/api/usd-rate", None, None).await;
    assert_eq!(first["data"]["rate"], second["data"]["rate"]);
}

#[tokio::test]
async fn admin_surface_requires_admin_role() {
    let (app, _uploads) = spawn_app().await;
    let (token, _) = register(&app, "plain@example.com").await;

    let (status, _) = request(&app, "GET", "/api/admin/stats", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(&app, "GET", "/api/admin/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = admin_token(&app).await;
    let (status, body) = request(&app, "GET", "/api/admin/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["total_investors"].is_u64() || body["data"]["total_investors"].is_number());
}

#[tokio::test]
async fn admin_balance_adjustment_leaves_audit_trail() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;
    let (token, user_id) = register(&app, "audited@example.com").await;

    fund(&app, &admin, &user_id, 500).await;

    let (_, me) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(me["data"]["balance"], 500);

    let (_, txs) = request(&app, "GET", "/api/transactions", Some(&token), None).await;
    let audit = &txs["data"][0];
    assert_eq!(audit["tx_type"], "deposit");
    assert_eq!(audit["amount"], 500);
    assert_eq!(audit["status"], "approved");
    assert!(audit["approved_by"].is_string());

    // Subtracting below zero is refused.
    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/admin/users/{user_id}/balance"),
        Some(&admin),
        Some(serde_json::json!({ "action": "subtract", "amount": 9_999 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn kyc_status_follows_review() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;
    let (token, _) = register(&app, "papers@example.com").await;

    let (status, body) = request(&app, "GET", "/api/kyc/status", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kyc_status"], "pending");

    approve_kyc(&app, &token, &admin).await;

    let (_, body) = request(&app, "GET", "/api/kyc/status", Some(&token), None).await;
    assert_eq!(body["data"]["kyc_status"], "approved");
    assert!(
        body["data"]["document"]["front_image"]
            .as_str()
            .unwrap()
            .starts_with("/api/uploads/kyc/")
    );
}

#[tokio::test]
async fn notifications_flow() {
    let (app, _uploads) = spawn_app().await;
    let (token, _) = register(&app, "notified@example.com").await;

    let (status, body) = request(&app, "GET", "/api/notifications", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let unread = body["data"]["unread_count"].as_u64().unwrap();
    assert!(unread >= 1, "expected a welcome notification");

    let (status, _) = request(
        &app,
        "POST",
        "/api/notifications/read-all",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = request(&app, "GET", "/api/notifications", Some(&token), None).await;
    assert_eq!(body["data"]["unread_count"], 0);
}

#[tokio::test]
async fn projects_and_banks_are_public() {
    let (app, _uploads) = spawn_app().await;

    let (status, body) = request(&app, "GET", "/api/projects", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let (status, body) = request(&app, "GET", "/api/projects?type=ges", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let solar = body["data"].as_array().unwrap();
    assert_eq!(solar.len(), 2);
    for project in solar {
        assert_eq!(project["project_type"], "GES");
    }

    // "all" means no filter, whatever the casing.
    let (status, body) = request(&app, "GET", "/api/projects?type=all", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let (_, body) = request(&app, "GET", "/api/projects?type=ALL", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let (status, body) = request(&app, "GET", "/api/banks", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let (status, _) = request(&app, "GET", "/api/projects/prj_missing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_keeps_projects_of_any_status() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/admin/projects",
        Some(&admin),
        Some(serde_json::json!({
            "name": "Konya Solar Park",
            "type": "ges",
            "return_rate": 7.0,
            "total_target": 1_000_000,
            "status": "upcoming"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = request(&app, "GET", "/api/projects", None, None).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();

    assert_eq!(names.len(), 5);
    assert!(names.contains(&"Konya Solar Park"));
}

#[tokio::test]
async fn change_password_flow() {
    let (app, _uploads) = spawn_app().await;
    let (token, _) = register(&app, "rotate@example.com").await;

    // Wrong current password.
    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/change-password",
        Some(&token),
        Some(serde_json::json!({
            "current_password": "not-the-password",
            "new_password": "brand-new-pass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // New password below the minimum length.
    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/change-password",
        Some(&token),
        Some(serde_json::json!({
            "current_password": "hunter22",
            "new_password": "abc"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/change-password",
        Some(&token),
        Some(serde_json::json!({
            "current_password": "hunter22",
            "new_password": "brand-new-pass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Old credentials are dead, new ones work.
    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({
            "email": "rotate@example.com",
            "password": "hunter22"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({
            "email": "rotate@example.com",
            "password": "brand-new-pass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_user_info_update_enforces_unique_email() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;
    register(&app, "taken@example.com").await;
    let (_, user_id) = register(&app, "movable@example.com").await;

    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/admin/users/{user_id}/info"),
        Some(&admin),
        Some(serde_json::json!({ "email": "taken@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/admin/users/{user_id}/info"),
        Some(&admin),
        Some(serde_json::json!({ "name": "Renamed", "email": "Moved@Example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["email"], "moved@example.com");
}

#[tokio::test]
async fn admin_manages_projects_and_banks() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/admin/projects",
        Some(&admin),
        Some(serde_json::json!({
            "name": "Mugla Solar Park",
            "type": "ges",
            "return_rate": 7.5,
            "total_target": 2_000_000,
            "location": "Mugla"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "project create failed: {body}");
    assert_eq!(body["data"]["project_type"], "GES");
    assert_eq!(body["data"]["funded_amount"], 0);
    let project_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/admin/projects/{project_id}"),
        Some(&admin),
        Some(serde_json::json!({
            "name": "Mugla Solar Park II",
            "type": "GES",
            "return_rate": 7.5,
            "total_target": 3_000_000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Mugla Solar Park II");

    let (status, body) = request(
        &app,
        "POST",
        "/api/admin/banks",
        Some(&admin),
        Some(serde_json::json!({
            "name": "Test Bank",
            "iban": "TR00 0000 0000 0000 0000 0000 00",
            "account_holder": "VoltFund A.S."
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let bank_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/admin/banks/{bank_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Soft-deleted banks disappear from the public listing.
    let (_, body) = request(&app, "GET", "/api/banks", None, None).await;
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|b| b["id"] != bank_id.as_str())
    );
}

#[tokio::test]
async fn admin_portfolio_view_joins_owner() {
    let (app, _uploads) = spawn_app().await;
    let admin = admin_token(&app).await;
    let (token, user_id) = register(&app, "joined@example.com").await;

    approve_kyc(&app, &token, &admin).await;
    fund(&app, &admin, &user_id, 25_000).await;
    let project_id = first_project_id(&app).await;

    request(
        &app,
        "POST",
        "/api/portfolio/invest",
        Some(&token),
        Some(serde_json::json!({ "project_id": project_id, "amount": 25_000 })),
    )
    .await;

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/admin/portfolios?user_id={user_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["user_email"], "joined@example.com");
    assert_eq!(entries[0]["user_name"], "Test Investor");
}
