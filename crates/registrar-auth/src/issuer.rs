//! Token pair issuance and subject revocation.

use std::sync::Arc;
use std::time::Duration;

use registrar_core::SubjectId;
use serde::Serialize;
use tracing::{info, instrument};

use crate::claims::{SignedToken, TokenKind, TokenPayload};
use crate::error::{StoreError, TokenError};
use crate::jwt::TokenCodec;
use crate::revocation::RevocationStore;

/// Access and refresh token handed to a client after login or refresh.
#[derive(Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// Mints token pairs bound to the subject's current revocation generation.
///
/// Used by the login collaborator after it has checked credentials, by the
/// refresh endpoint, and by the logout endpoint to revoke.
#[derive(Clone)]
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    store: Arc<dyn RevocationStore>,
    store_timeout: Duration,
}

impl TokenIssuer {
    pub fn new(
        codec: Arc<TokenCodec>,
        store: Arc<dyn RevocationStore>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            codec,
            store,
            store_timeout,
        }
    }

    async fn current_generation(&self, subject_id: SubjectId) -> Result<u64, TokenError> {
        let generation =
            tokio::time::timeout(self.store_timeout, self.store.current_generation(subject_id))
                .await
                .map_err(|_| StoreError::Timeout)??;
        Ok(generation)
    }

    /// Issues a single token of `kind` for `payload`, valid from now.
    ///
    /// Refresh tokens are bound to the subject's current revocation
    /// generation, so a token issued after [`TokenIssuer::revoke`] is accepted.
    ///
    /// # Errors
    ///
    /// Fails without issuing anything if a refresh token is requested and the
    /// revocation store cannot be read within the timeout, or if signing fails.
    #[instrument(skip(self), fields(subject_id = payload.subject_id, kind = kind.as_str()))]
    pub async fn issue(
        &self,
        payload: TokenPayload,
        kind: TokenKind,
    ) -> Result<SignedToken, TokenError> {
        match kind {
            TokenKind::Access => self.codec.issue(&payload, kind),
            TokenKind::Refresh => {
                let generation = self.current_generation(payload.subject_id).await?;
                self.codec.issue_refresh(&payload, generation)
            }
        }
    }

    /// Issues a fresh access and refresh token for `payload`.
    ///
    /// # Errors
    ///
    /// Same as [`TokenIssuer::issue`] for a refresh token.
    #[instrument(skip(self), fields(subject_id = payload.subject_id))]
    pub async fn issue_pair(&self, payload: TokenPayload) -> Result<TokenPair, TokenError> {
        let refresh = self.issue(payload, TokenKind::Refresh).await?;
        let access = self.issue(payload, TokenKind::Access).await?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            token_type: "Bearer",
            expires_in: self.codec.ttl(TokenKind::Access),
        })
    }

    /// Invalidates every refresh token issued to `subject_id` so far.
    #[instrument(skip(self))]
    pub async fn revoke(&self, subject_id: SubjectId) -> Result<u64, TokenError> {
        let generation = tokio::time::timeout(self.store_timeout, self.store.revoke(subject_id))
            .await
            .map_err(|_| StoreError::Timeout)??;

        info!(subject_id, generation, "Refresh tokens revoked");
        Ok(generation)
    }
}
