//! Token claim structures.
//!
//! - [`TokenPayload`]: The minimal identity carried by every token
//! - [`Claims`]: The signed claim set shared by access and refresh tokens
//! - [`VerifiedToken`]: A payload plus metadata after successful verification
//! - [`SignedToken`]: An encoded token as handed to clients

use std::fmt;

use registrar_core::{Role, SubjectId};
use serde::{Deserialize, Serialize};

/// Which signing context a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }

    pub fn other(&self) -> TokenKind {
        match self {
            TokenKind::Access => TokenKind::Refresh,
            TokenKind::Refresh => TokenKind::Access,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity carried by a token. No personal data beyond the subject id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPayload {
    pub subject_id: SubjectId,
    pub role: Role,
}

impl TokenPayload {
    pub fn new(subject_id: SubjectId, role: Role) -> Self {
        Self { subject_id, role }
    }
}

/// Claims embedded in every signed token.
///
/// # Fields
///
/// - `sub`: Subject id, rendered as a string per JWT convention
/// - `role`: The subject's single application role
/// - `kind`: Signing context, checked again after signature validation
/// - `iss`: Configured issuer
/// - `iat` / `exp`: Issued-at and expiry (Unix seconds)
/// - `jti`: Unique token identifier
/// - `gen`: Revocation generation at issuance (refresh tokens only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub kind: TokenKind,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    #[serde(rename = "gen", default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<u64>,
}

/// A token that passed signature, kind and expiry checks.
///
/// Only [`TokenCodec::verify`](crate::TokenCodec::verify) produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub(crate) payload: TokenPayload,
    pub(crate) kind: TokenKind,
    pub(crate) issued_at: i64,
    pub(crate) expires_at: i64,
    pub(crate) token_id: String,
    pub(crate) generation: u64,
}

impl VerifiedToken {
    pub fn payload(&self) -> &TokenPayload {
        &self.payload
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    /// Revocation generation the token was minted under; zero for access tokens.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Encoded token string with the metadata needed to hand it to a client.
#[derive(Clone)]
pub struct SignedToken {
    pub token: String,
    pub kind: TokenKind,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl SignedToken {
    pub fn as_str(&self) -> &str {
        &self.token
    }
}

// Token text stays out of logs.
impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedToken")
            .field("kind", &self.kind)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims(generation: Option<u64>) -> Claims {
        Claims {
            sub: "42".to_string(),
            role: Role::Student,
            kind: TokenKind::Refresh,
            iss: "registrar".to_string(),
            iat: 1234567800,
            exp: 1234567890,
            jti: "test-jti-123".to_string(),
            generation,
        }
    }

    #[test]
    fn test_claims_serialize() {
        let serialized = serde_json::to_string(&sample_claims(Some(3))).unwrap();
        assert!(serialized.contains(r#""sub":"42""#));
        assert!(serialized.contains(r#""role":"student""#));
        assert!(serialized.contains(r#""kind":"refresh""#));
        assert!(serialized.contains(r#""gen":3"#));
    }

    #[test]
    fn test_access_claims_omit_generation() {
        let serialized = serde_json::to_string(&sample_claims(None)).unwrap();
        assert!(!serialized.contains("gen"));
    }

    #[test]
    fn test_claims_deserialize_without_generation() {
        let json = r#"{"sub":"7","role":"admin","kind":"access","iss":"registrar","iat":9999999900,"exp":9999999999,"jti":"x"}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.generation, None);
    }

    #[test]
    fn test_token_kind_other() {
        assert_eq!(TokenKind::Access.other(), TokenKind::Refresh);
        assert_eq!(TokenKind::Refresh.other(), TokenKind::Access);
    }

    #[test]
    fn test_signed_token_debug_hides_token() {
        let signed = SignedToken {
            token: "eyJhbGciOiJIUzI1NiJ9.secret.sig".to_string(),
            kind: TokenKind::Access,
            issued_at: 1,
            expires_at: 2,
        };
        assert!(!format!("{:?}", signed).contains("eyJ"));
    }
}
