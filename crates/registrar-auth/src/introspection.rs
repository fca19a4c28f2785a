//! Token introspection: verification plus revocation check.
//!
//! Access introspection is a pure cryptographic check with no I/O. Refresh
//! introspection additionally consults the [`RevocationStore`] and is the only
//! path that touches shared state. Store errors and timeouts fail closed.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::claims::{TokenKind, TokenPayload, VerifiedToken};
use crate::error::AuthFailure;
use crate::identity::{RefreshRequester, Requester};
use crate::jwt::TokenCodec;
use crate::revocation::RevocationStore;

/// Outcome of introspecting one token.
///
/// `is_ok()` is true exactly when a payload is present, and a successful
/// result never carries an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectionResult {
    verified: Option<VerifiedToken>,
    error: Option<AuthFailure>,
}

impl IntrospectionResult {
    fn succeeded(verified: VerifiedToken) -> Self {
        Self {
            verified: Some(verified),
            error: None,
        }
    }

    fn failed(error: AuthFailure) -> Self {
        Self {
            verified: None,
            error: Some(error),
        }
    }

    fn from_verdict(result: Result<VerifiedToken, AuthFailure>) -> Self {
        match result {
            Ok(verified) => Self::succeeded(verified),
            Err(error) => Self::failed(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.verified.is_some()
    }

    pub fn payload(&self) -> Option<&TokenPayload> {
        self.verified.as_ref().map(|v| &v.payload)
    }

    pub fn error(&self) -> Option<AuthFailure> {
        self.error
    }

    pub fn verified(&self) -> Option<&VerifiedToken> {
        self.verified.as_ref()
    }

    /// Promotes an access-token verdict to a request identity.
    pub fn into_requester(self) -> Result<Requester, AuthFailure> {
        match self.into_verified()? {
            v if v.kind == TokenKind::Access => Ok(Requester::new(v.payload)),
            _ => Err(AuthFailure::WrongKind),
        }
    }

    /// Promotes a refresh-token verdict to a refresh identity.
    pub fn into_refresh_requester(self) -> Result<RefreshRequester, AuthFailure> {
        match self.into_verified()? {
            v if v.kind == TokenKind::Refresh => Ok(RefreshRequester::new(v.payload, v.generation)),
            _ => Err(AuthFailure::WrongKind),
        }
    }

    fn into_verified(self) -> Result<VerifiedToken, AuthFailure> {
        match (self.verified, self.error) {
            (Some(verified), None) => Ok(verified),
            (_, Some(error)) => Err(error),
            (None, None) => Err(AuthFailure::MalformedToken),
        }
    }
}

/// Combines [`TokenCodec`] verification with the revocation check.
#[derive(Clone)]
pub struct TokenIntrospector {
    codec: Arc<TokenCodec>,
    store: Arc<dyn RevocationStore>,
    store_timeout: Duration,
}

impl TokenIntrospector {
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

    /// Verifies an access token. No store lookup.
    #[instrument(skip_all)]
    pub fn introspect_access(&self, token: &str) -> IntrospectionResult {
        let result = self.codec.verify(token, TokenKind::Access);
        if let Err(failure) = &result {
            debug!(reason = failure.reason(), "Access token rejected");
        }
        IntrospectionResult::from_verdict(result)
    }

    /// Verifies a refresh token and rejects it if its subject was revoked
    /// after the token was minted.
    ///
    /// The store call is bounded by the configured timeout. Dropping the
    /// returned future abandons the lookup without writing anything.
    #[instrument(skip_all)]
    pub async fn introspect_refresh(&self, token: &str) -> IntrospectionResult {
        let verified = match self.codec.verify(token, TokenKind::Refresh) {
            Ok(verified) => verified,
            Err(failure) => {
                debug!(reason = failure.reason(), "Refresh token rejected");
                return IntrospectionResult::failed(failure);
            }
        };

        let subject_id = verified.payload.subject_id;
        let lookup = self.store.is_revoked(subject_id, verified.generation);

        match tokio::time::timeout(self.store_timeout, lookup).await {
            Ok(Ok(false)) => IntrospectionResult::succeeded(verified),
            Ok(Ok(true)) => {
                debug!(subject_id, generation = verified.generation, "Refresh token revoked");
                IntrospectionResult::failed(AuthFailure::Revoked)
            }
            Ok(Err(e)) => {
                warn!(subject_id, error = %e, "Revocation lookup failed");
                IntrospectionResult::failed(AuthFailure::StoreUnavailable)
            }
            Err(_) => {
                warn!(
                    subject_id,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Revocation lookup timed out"
                );
                IntrospectionResult::failed(AuthFailure::StoreUnavailable)
            }
        }
    }
}
