use anyhow::anyhow;
use registrar_auth::{RefreshRequester, Requester, TokenError, TokenIssuer, TokenPair};
use registrar_core::AppError;
use tracing::{error, instrument};

use crate::metrics::{track_revocation, track_tokens_issued};

pub struct AuthService;

impl AuthService {
    /// Mints a new pair for the subject behind a valid, unrevoked refresh token.
    #[instrument(skip(issuer), fields(subject_id = requester.subject_id()))]
    pub async fn refresh(
        issuer: &TokenIssuer,
        requester: &RefreshRequester,
    ) -> Result<TokenPair, AppError> {
        let pair = issuer
            .issue_pair(requester.payload())
            .await
            .map_err(token_error)?;

        track_tokens_issued("access");
        track_tokens_issued("refresh");
        Ok(pair)
    }

    /// Invalidates every refresh token the caller holds.
    #[instrument(skip(issuer), fields(subject_id = requester.subject_id()))]
    pub async fn logout(issuer: &TokenIssuer, requester: &Requester) -> Result<(), AppError> {
        issuer
            .revoke(requester.subject_id())
            .await
            .map_err(token_error)?;

        track_revocation();
        Ok(())
    }
}

fn token_error(err: TokenError) -> AppError {
    match err {
        TokenError::Store(e) => {
            error!(error = %e, "Revocation store unavailable");
            AppError::service_unavailable(anyhow!("Service temporarily unavailable"))
        }
        other => {
            error!(error = %other, "Token issuance failed");
            AppError::internal(anyhow!("Internal server error"))
        }
    }
}
