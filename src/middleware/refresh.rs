//! Refresh guard, used only by the token reissue route.
//!
//! It writes a [`RefreshRequester`], a different type from the access
//! guard's [`Requester`](registrar_auth::Requester), so neither guard can
//! satisfy the other's handlers.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use registrar_auth::{AuthFailure, RefreshRequester};
use registrar_core::AppError;

use crate::middleware::auth::{bearer_token, reject};
use crate::state::AppState;

pub async fn authenticate_refresh(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let verdict = match bearer_token(req.headers()) {
        Ok(auth) => state.introspector.introspect_refresh(auth.token()).await,
        Err(failure) => {
            warn!(path = %req.uri().path(), reason = failure.reason(), "Refresh rejected");
            return Err(reject(failure));
        }
    };

    let requester = verdict.into_refresh_requester().map_err(|failure| {
        warn!(path = %req.uri().path(), reason = failure.reason(), "Refresh rejected");
        reject(failure)
    })?;

    req.extensions_mut().insert(requester);
    Ok(next.run(req).await)
}

/// Extractor for the identity attached by [`authenticate_refresh`].
#[derive(Debug, Clone)]
pub struct RefreshUser(pub RefreshRequester);

impl<S> FromRequestParts<S> for RefreshUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RefreshRequester>()
            .cloned()
            .map(RefreshUser)
            .ok_or_else(|| {
                error!(path = %parts.uri.path(), "Handler reached without refresh guard");
                reject(AuthFailure::MissingCredential)
            })
    }
}
