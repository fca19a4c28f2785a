use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use registrar_auth::{Requester, TokenPair};
use registrar_core::AppError;
use tracing::instrument;

use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::middleware::refresh::RefreshUser;
use crate::state::AppState;

/// Exchange a refresh token for a new token pair
#[instrument(skip(state, requester))]
pub async fn refresh_tokens(
    State(state): State<AppState>,
    RefreshUser(requester): RefreshUser,
) -> Result<Json<TokenPair>, AppError> {
    let pair = AuthService::refresh(state.issuer(), &requester).await?;
    Ok(Json(pair))
}

/// Revoke every refresh token held by the caller
#[instrument(skip(state, requester))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
) -> Result<StatusCode, AppError> {
    AuthService::logout(state.issuer(), &requester).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Identity attached to the current request
pub async fn me(AuthUser(requester): AuthUser) -> Json<Requester> {
    Json(requester)
}
