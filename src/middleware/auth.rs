//! Authentication guard for access-token routes.

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::{error, warn};

use registrar_auth::{AuthFailure, Requester};
use registrar_core::AppError;

use crate::metrics::track_auth_failure;
use crate::state::AppState;

/// Extracts the bearer credential from the `Authorization` header.
///
/// Absence is [`AuthFailure::MissingCredential`]; any other scheme or an
/// empty token is [`AuthFailure::MalformedToken`].
pub fn bearer_token(headers: &HeaderMap) -> Result<Authorization<Bearer>, AuthFailure> {
    match headers.typed_try_get::<Authorization<Bearer>>() {
        Ok(Some(auth)) if !auth.token().trim().is_empty() => Ok(auth),
        Ok(Some(_)) | Err(_) => Err(AuthFailure::MalformedToken),
        Ok(None) => Err(AuthFailure::MissingCredential),
    }
}

/// Converts a failure into the caller-facing error.
///
/// The response message is uniform per status; the precise reason goes to
/// logs and metrics only.
pub fn reject(failure: AuthFailure) -> AppError {
    track_auth_failure(failure.reason());

    if failure.is_forbidden() {
        AppError::forbidden(anyhow!("Forbidden"))
    } else {
        AppError::unauthorized(anyhow!("Unauthorized"))
    }
}

/// Middleware that authenticates the caller with an access token.
///
/// On success exactly one [`Requester`] is written to the request extensions
/// before the inner service runs. On failure the request never reaches the
/// inner service.
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/me", get(me))
///     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
/// ```
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let verdict = match bearer_token(req.headers()) {
        Ok(auth) => state.introspector.introspect_access(auth.token()),
        Err(failure) => {
            warn!(path = %req.uri().path(), reason = failure.reason(), "Authentication rejected");
            return Err(reject(failure));
        }
    };

    let requester = verdict.into_requester().map_err(|failure| {
        warn!(path = %req.uri().path(), reason = failure.reason(), "Authentication rejected");
        reject(failure)
    })?;

    req.extensions_mut().insert(requester);
    Ok(next.run(req).await)
}

/// Extractor for the identity attached by [`authenticate`].
///
/// Never verifies tokens itself. A handler mounted without the guard gets
/// Unauthorized rather than an unauthenticated identity.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Requester);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Requester>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                error!(path = %parts.uri.path(), "Handler reached without authentication guard");
                reject(AuthFailure::MissingCredential)
            })
    }
}
