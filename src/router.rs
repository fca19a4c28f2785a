use axum::http::{HeaderValue, Method, header};
use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::auth::authenticate;
use crate::middleware::role::authorize;
use crate::modules::auth::router::init_auth_router;
use crate::state::AppState;

/// Places `routes` behind authentication and the role policy.
///
/// The role guard is layered first so that it runs inside the
/// authentication guard.
pub fn protect(state: &AppState, routes: Router<AppState>) -> Router<AppState> {
    routes
        .route_layer(middleware::from_fn_with_state(state.clone(), authorize))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
}

pub fn init_router(state: AppState) -> Router {
    let routes = base_routes(&state);
    finish(state, routes)
}

/// Builds the application router with additional business routes.
///
/// `api_routes` are declared with their full `/api/...` paths, which is what
/// the role policy keys on, and are mounted behind [`protect`]. They must
/// contain at least one route.
pub fn init_router_with(state: AppState, api_routes: Router<AppState>) -> Router {
    let routes = base_routes(&state).merge(protect(&state, api_routes));
    finish(state, routes)
}

fn base_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", init_auth_router(state))
}

fn finish(state: AppState, routes: Router<AppState>) -> Router {
    let cors = cors_layer(&state);

    // Metrics run inside routing so the path label is the matched template.
    routes
        .route_layer(middleware::from_fn(metrics_middleware))
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
