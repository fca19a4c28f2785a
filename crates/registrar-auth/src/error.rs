//! Failure taxonomy for authentication and authorization.

/// Why a request could not be authenticated or authorized.
///
/// Variants are terminal for the request that produced them. Only
/// [`AuthFailure::InsufficientRole`] maps to a Forbidden response; every other
/// variant is an authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("no bearer credential presented")]
    MissingCredential,

    #[error("token is malformed")]
    MalformedToken,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token kind does not match the expected kind")]
    WrongKind,

    #[error("token has been revoked")]
    Revoked,

    #[error("revocation store unavailable")]
    StoreUnavailable,

    #[error("caller role is not permitted for this operation")]
    InsufficientRole,
}

impl AuthFailure {
    /// Stable, low-cardinality code for logs and metric labels.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthFailure::MissingCredential => "missing_credential",
            AuthFailure::MalformedToken => "malformed",
            AuthFailure::InvalidSignature => "invalid_signature",
            AuthFailure::Expired => "expired",
            AuthFailure::WrongKind => "wrong_kind",
            AuthFailure::Revoked => "revoked",
            AuthFailure::StoreUnavailable => "store_unavailable",
            AuthFailure::InsufficientRole => "insufficient_role",
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, AuthFailure::InsufficientRole)
    }
}

/// Error reported by a [`RevocationStore`](crate::RevocationStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("revocation store backend error: {0}")]
    Backend(String),

    #[error("revocation store call timed out")]
    Timeout,
}

/// Error raised while minting tokens or revoking a subject.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("refresh tokens must be issued with the subject's revocation generation")]
    UnboundRefresh,

    #[error("token lifetime of {0} seconds is out of range")]
    ExpiryOutOfRange(i64),
}
