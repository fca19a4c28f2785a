#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use http_body_util::BodyExt;
use registrar::middleware::auth::AuthUser;
use registrar::middleware::role::RolePolicy;
use registrar::router::init_router_with;
use registrar::state::AppState;
use registrar_auth::{
    InMemoryRevocationStore, Requester, RevocationStore, TokenCodec, TokenIssuer, TokenKind,
    TokenPair, TokenPayload,
};
use registrar_config::{CorsConfig, JwtConfig};
use registrar_core::{Role, SubjectId};
use serde_json::Value;
use tower::ServiceExt;

pub const STORE_TIMEOUT: Duration = Duration::from_millis(100);

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "test-access-secret-key-at-least-32-chars".to_string(),
        refresh_secret: "test-refresh-secret-key-at-least-32-chars".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 604800,
        issuer: "registrar".to_string(),
        leeway: 0,
    }
}

/// Echoes the identity attached by the authentication guard.
pub async fn whoami(AuthUser(requester): AuthUser) -> Json<Requester> {
    Json(requester)
}

pub struct TestApp {
    pub router: Router,
    pub codec: TokenCodec,
    pub issuer: TokenIssuer,
}

impl TestApp {
    pub fn new(policy: RolePolicy, api_routes: Router<AppState>) -> Self {
        Self::with_store(Arc::new(InMemoryRevocationStore::new()), policy, api_routes)
    }

    pub fn with_store(
        store: Arc<dyn RevocationStore>,
        policy: RolePolicy,
        api_routes: Router<AppState>,
    ) -> Self {
        let jwt_config = test_jwt_config();
        let state = AppState::new(
            &jwt_config,
            store,
            STORE_TIMEOUT,
            policy,
            CorsConfig::from_origins("http://localhost:3000"),
        );
        let issuer = state.issuer().clone();

        Self {
            router: init_router_with(state, api_routes),
            codec: TokenCodec::new(&jwt_config),
            issuer,
        }
    }

    pub fn access_token(&self, subject_id: SubjectId, role: Role) -> String {
        self.codec
            .issue(&TokenPayload::new(subject_id, role), TokenKind::Access)
            .unwrap()
            .token
    }

    pub async fn pair(&self, subject_id: SubjectId, role: Role) -> TokenPair {
        self.issuer
            .issue_pair(TokenPayload::new(subject_id, role))
            .await
            .unwrap()
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(Method::GET, uri, token).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(Method::POST, uri, token).await
    }
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
