mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::http::{StatusCode, header};
use axum::routing::get;
use chrono::Utc;
use registrar::middleware::role::RolePolicy;
use registrar_auth::{RevocationStore, StoreError, TokenKind, TokenPayload};
use registrar_core::{Role, SubjectId};

use common::{TestApp, json_body, whoami};

struct FailingStore;

#[async_trait]
impl RevocationStore for FailingStore {
    async fn current_generation(&self, _subject_id: SubjectId) -> Result<u64, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn revoke(&self, _subject_id: SubjectId) -> Result<u64, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}

struct SlowStore;

#[async_trait]
impl RevocationStore for SlowStore {
    async fn current_generation(&self, _subject_id: SubjectId) -> Result<u64, StoreError> {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Ok(0)
    }

    async fn revoke(&self, _subject_id: SubjectId) -> Result<u64, StoreError> {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Ok(1)
    }
}

fn app() -> TestApp {
    TestApp::new(RolePolicy::new(), Router::new().route("/api/open", get(whoami)))
}

#[tokio::test]
async fn test_health_requires_no_token() {
    let app = app();
    let response = app.get("/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_header_is_unauthorized() {
    let app = app();
    let response = app.get("/api/auth/me", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    assert_eq!(json_body(response).await["error"], "Unauthorized");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = app();
    let response = app.get("/api/auth/me", Some("not-a-jwt")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let app = app();
    let expired = app
        .codec
        .issue_at(
            &TokenPayload::new(42, Role::Student),
            TokenKind::Access,
            0,
            Utc::now().timestamp() - 3600,
        )
        .unwrap();

    let response = app.get("/api/auth/me", Some(expired.as_str())).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Unauthorized");
}

#[tokio::test]
async fn test_tampered_token_is_unauthorized() {
    let app = app();
    let token = app.access_token(42, Role::Student);
    let tampered = format!("{}x", token);

    let response = app.get("/api/auth/me", Some(&tampered)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_attaches_identity() {
    let app = app();
    let token = app.access_token(42, Role::Student);

    let response = app.get("/api/auth/me", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["subject_id"], 42);
    assert_eq!(body["role"], "student");
}

#[tokio::test]
async fn test_business_route_sees_same_identity() {
    let app = app();
    let token = app.access_token(9, Role::Lecturer);

    let body = json_body(app.get("/api/open", Some(&token)).await).await;

    assert_eq!(body["subject_id"], 9);
    assert_eq!(body["role"], "lecturer");
}

#[tokio::test]
async fn test_refresh_token_rejected_on_access_route() {
    let app = app();
    let pair = app.pair(42, Role::Student).await;

    let me = app.get("/api/auth/me", Some(&pair.refresh_token)).await;
    let open = app.get("/api/open", Some(&pair.refresh_token)).await;

    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(open.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_access_token_rejected_on_refresh_route() {
    let app = app();
    let pair = app.pair(42, Role::Student).await;

    let response = app.post("/api/auth/refresh", Some(&pair.access_token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_working_pair() {
    let app = app();
    let pair = app.pair(7, Role::Admin).await;

    let response = app.post("/api/auth/refresh", Some(&pair.refresh_token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 900);

    let access = body["access_token"].as_str().unwrap();
    let me = json_body(app.get("/api/auth/me", Some(access)).await).await;
    assert_eq!(me["subject_id"], 7);
    assert_eq!(me["role"], "admin");
}

#[tokio::test]
async fn test_logout_revokes_earlier_refresh_tokens() {
    let app = app();
    let before = app.pair(7, Role::Student).await;

    let logout = app.post("/api/auth/logout", Some(&before.access_token)).await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let rejected = app.post("/api/auth/refresh", Some(&before.refresh_token)).await;
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

    let after = app.pair(7, Role::Student).await;
    let accepted = app.post("/api/auth/refresh", Some(&after.refresh_token)).await;
    assert_eq!(accepted.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_leaves_access_tokens_valid_until_expiry() {
    let app = app();
    let pair = app.pair(7, Role::Student).await;

    app.post("/api/auth/logout", Some(&pair.access_token)).await;
    let response = app.get("/api/auth/me", Some(&pair.access_token)).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_revocation_is_per_subject() {
    let app = app();
    let seven = app.pair(7, Role::Student).await;
    let eight = app.pair(8, Role::Student).await;

    app.post("/api/auth/logout", Some(&seven.access_token)).await;
    let response = app.post("/api/auth/refresh", Some(&eight.refresh_token)).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_store_failure_rejects_refresh() {
    let app = TestApp::with_store(
        Arc::new(FailingStore),
        RolePolicy::new(),
        Router::new().route("/api/open", get(whoami)),
    );
    let refresh = app
        .codec
        .issue_refresh(&TokenPayload::new(7, Role::Student), 0)
        .unwrap();

    let response = app.post("/api/auth/refresh", Some(refresh.as_str())).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Unauthorized");
}

#[tokio::test]
async fn test_store_failure_does_not_affect_access_routes() {
    let app = TestApp::with_store(
        Arc::new(FailingStore),
        RolePolicy::new(),
        Router::new().route("/api/open", get(whoami)),
    );
    let token = app.access_token(7, Role::Student);

    let response = app.get("/api/open", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_store_failure_on_logout_is_unavailable() {
    let app = TestApp::with_store(
        Arc::new(FailingStore),
        RolePolicy::new(),
        Router::new().route("/api/open", get(whoami)),
    );
    let token = app.access_token(7, Role::Student);

    let response = app.post("/api/auth/logout", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_slow_store_times_out_and_rejects_refresh() {
    let app = TestApp::with_store(
        Arc::new(SlowStore),
        RolePolicy::new(),
        Router::new().route("/api/open", get(whoami)),
    );
    let refresh = app
        .codec
        .issue_refresh(&TokenPayload::new(7, Role::Student), 0)
        .unwrap();

    let response = app.post("/api/auth/refresh", Some(refresh.as_str())).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_single_refresh_token_issued_after_logout_is_accepted() {
    let app = app();
    let before = app.pair(7, Role::Student).await;
    app.post("/api/auth/logout", Some(&before.access_token)).await;

    let refresh = app
        .issuer
        .issue(TokenPayload::new(7, Role::Student), TokenKind::Refresh)
        .await
        .unwrap();
    let response = app.post("/api/auth/refresh", Some(refresh.as_str())).await;

    assert_eq!(response.status(), StatusCode::OK);
}
