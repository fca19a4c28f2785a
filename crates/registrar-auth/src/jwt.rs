//! JWT signing and verification for access and refresh tokens.
//!
//! [`TokenCodec`] holds one key pair per [`TokenKind`]. Access and refresh
//! tokens share a claim shape but are signed with independent secrets, so a
//! token of one kind never verifies as the other.
//!
//! # Example
//!
//! ```ignore
//! use registrar_auth::{TokenCodec, TokenKind, TokenPayload};
//! use registrar_config::JwtConfig;
//!
//! let codec = TokenCodec::new(&JwtConfig::from_env()?);
//!
//! let signed = codec.issue(&TokenPayload::new(42, Role::Student), TokenKind::Access)?;
//! let verified = codec.verify(signed.as_str(), TokenKind::Access)?;
//! assert_eq!(verified.payload().subject_id, 42);
//! ```

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use uuid::Uuid;

use registrar_config::JwtConfig;

use crate::claims::{Claims, SignedToken, TokenKind, TokenPayload, VerifiedToken};
use crate::error::{AuthFailure, TokenError};

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: i64,
}

impl SigningKeys {
    fn new(secret: &str, ttl: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

/// Signs and verifies tokens of both kinds.
///
/// Stateless apart from its keys; safe to share across threads behind an `Arc`.
pub struct TokenCodec {
    access: SigningKeys,
    refresh: SigningKeys,
    issuer: String,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access.ttl)
            .field("refresh_ttl", &self.refresh.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(jwt_config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = jwt_config.leeway;
        validation.validate_exp = true;
        validation.set_issuer(&[jwt_config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);

        Self {
            access: SigningKeys::new(&jwt_config.access_secret, jwt_config.access_token_expiry),
            refresh: SigningKeys::new(&jwt_config.refresh_secret, jwt_config.refresh_token_expiry),
            issuer: jwt_config.issuer.clone(),
            validation,
        }
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Lifetime in seconds of tokens of the given kind.
    pub fn ttl(&self, kind: TokenKind) -> i64 {
        self.keys(kind).ttl
    }

    /// Issues a token of `kind` for `payload`, valid from now for the kind's TTL.
    ///
    /// The codec cannot see revocation state, so only access tokens are minted
    /// here. Refresh tokens come from [`TokenIssuer`](crate::TokenIssuer), or
    /// from [`TokenCodec::issue_refresh`] with the subject's current generation.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::UnboundRefresh`] for [`TokenKind::Refresh`], and
    /// [`TokenError::Encoding`] if signing fails.
    pub fn issue(&self, payload: &TokenPayload, kind: TokenKind) -> Result<SignedToken, TokenError> {
        match kind {
            TokenKind::Access => self.issue_at(payload, kind, 0, Utc::now().timestamp()),
            TokenKind::Refresh => Err(TokenError::UnboundRefresh),
        }
    }

    /// Issues a refresh token bound to the subject's revocation `generation`.
    pub fn issue_refresh(
        &self,
        payload: &TokenPayload,
        generation: u64,
    ) -> Result<SignedToken, TokenError> {
        self.issue_at(payload, TokenKind::Refresh, generation, Utc::now().timestamp())
    }

    /// Issues a token with an explicit issued-at timestamp (Unix seconds).
    ///
    /// `generation` is embedded for refresh tokens and ignored for access tokens.
    pub fn issue_at(
        &self,
        payload: &TokenPayload,
        kind: TokenKind,
        generation: u64,
        issued_at: i64,
    ) -> Result<SignedToken, TokenError> {
        let keys = self.keys(kind);
        let expires_at = issued_at
            .checked_add(keys.ttl)
            .ok_or(TokenError::ExpiryOutOfRange(keys.ttl))?;

        let claims = Claims {
            sub: payload.subject_id.to_string(),
            role: payload.role,
            kind,
            iss: self.issuer.clone(),
            iat: issued_at,
            exp: expires_at,
            jti: Uuid::new_v4().to_string(),
            generation: match kind {
                TokenKind::Access => None,
                TokenKind::Refresh => Some(generation),
            },
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)?;

        Ok(SignedToken {
            token,
            kind,
            issued_at,
            expires_at,
        })
    }

    /// Verifies `token` as a token of `kind`.
    ///
    /// Checks, in order: signature against the kind's secret, expiry and
    /// issuer, then the embedded `kind` claim.
    ///
    /// # Errors
    ///
    /// Ordinary invalid input never panics; it yields one of
    /// [`AuthFailure::MalformedToken`], [`AuthFailure::InvalidSignature`],
    /// [`AuthFailure::Expired`] or [`AuthFailure::WrongKind`].
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<VerifiedToken, AuthFailure> {
        let claims = decode::<Claims>(token, &self.keys(kind).decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| self.classify(token, kind, e.kind()))?;

        if claims.kind != kind {
            return Err(AuthFailure::WrongKind);
        }

        let subject_id = claims
            .sub
            .parse()
            .map_err(|_| AuthFailure::MalformedToken)?;

        Ok(VerifiedToken {
            payload: TokenPayload::new(subject_id, claims.role),
            kind: claims.kind,
            issued_at: claims.iat,
            expires_at: claims.exp,
            token_id: claims.jti,
            generation: claims.generation.unwrap_or(0),
        })
    }

    fn classify(&self, token: &str, kind: TokenKind, error: &ErrorKind) -> AuthFailure {
        match error {
            ErrorKind::ExpiredSignature => AuthFailure::Expired,
            ErrorKind::InvalidSignature => {
                // Signed under the other context: report the substitution attempt
                // precisely, regardless of the token's own expiry.
                let mut other_kind = self.validation.clone();
                other_kind.validate_exp = false;
                match decode::<Claims>(token, &self.keys(kind.other()).decoding, &other_kind) {
                    Ok(_) => AuthFailure::WrongKind,
                    Err(_) => AuthFailure::InvalidSignature,
                }
            }
            _ => AuthFailure::MalformedToken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_core::Role;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            access_secret: "access-secret-key-at-least-32-characters".to_string(),
            refresh_secret: "refresh-secret-key-at-least-32-characters".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
            issuer: "registrar".to_string(),
            leeway: 0,
        }
    }

    fn student() -> TokenPayload {
        TokenPayload::new(42, Role::Student)
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let codec = TokenCodec::new(&get_test_jwt_config());

        let signed = codec.issue(&student(), TokenKind::Access).unwrap();
        let verified = codec.verify(signed.as_str(), TokenKind::Access).unwrap();

        assert_eq!(verified.payload, student());
        assert_eq!(verified.kind, TokenKind::Access);
        assert_eq!(verified.expires_at - verified.issued_at, 900);
        assert_eq!(verified.generation, 0);
    }

    #[test]
    fn test_issue_and_verify_refresh_token_keeps_generation() {
        let codec = TokenCodec::new(&get_test_jwt_config());

        let signed = codec.issue_refresh(&student(), 5).unwrap();
        let verified = codec.verify(signed.as_str(), TokenKind::Refresh).unwrap();

        assert_eq!(verified.payload, student());
        assert_eq!(verified.generation, 5);
    }

    #[test]
    fn test_round_trip_for_every_role_and_kind() {
        let codec = TokenCodec::new(&get_test_jwt_config());

        for role in Role::ALL {
            for kind in [TokenKind::Access, TokenKind::Refresh] {
                let payload = TokenPayload::new(-17, role);
                let signed = codec.issue_at(&payload, kind, 0, Utc::now().timestamp()).unwrap();
                assert_eq!(codec.verify(signed.as_str(), kind).unwrap().payload, payload);
            }
        }
    }

    #[test]
    fn test_refresh_token_expiry_longer_than_access() {
        let codec = TokenCodec::new(&get_test_jwt_config());

        let access = codec.issue(&student(), TokenKind::Access).unwrap();
        let refresh = codec.issue_refresh(&student(), 0).unwrap();

        assert!(refresh.expires_at > access.expires_at);
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let codec = TokenCodec::new(&get_test_jwt_config());

        let signed = codec.issue(&student(), TokenKind::Access).unwrap();

        assert_eq!(
            codec.verify(signed.as_str(), TokenKind::Refresh),
            Err(AuthFailure::WrongKind)
        );
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let codec = TokenCodec::new(&get_test_jwt_config());

        let signed = codec.issue_refresh(&student(), 0).unwrap();

        assert_eq!(
            codec.verify(signed.as_str(), TokenKind::Access),
            Err(AuthFailure::WrongKind)
        );
    }

    #[test]
    fn test_expired_wrong_kind_still_reported_as_wrong_kind() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        let long_ago = Utc::now().timestamp() - 30 * 24 * 3600;

        let signed = codec
            .issue_at(&student(), TokenKind::Refresh, 0, long_ago)
            .unwrap();

        assert_eq!(
            codec.verify(signed.as_str(), TokenKind::Access),
            Err(AuthFailure::WrongKind)
        );
    }

    #[test]
    fn test_expired_access_token() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        let two_hours_ago = Utc::now().timestamp() - 7200;

        let signed = codec
            .issue_at(&student(), TokenKind::Access, 0, two_hours_ago)
            .unwrap();

        assert_eq!(
            codec.verify(signed.as_str(), TokenKind::Access),
            Err(AuthFailure::Expired)
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        let signed = codec.issue(&student(), TokenKind::Access).unwrap();

        let other = TokenCodec::new(&JwtConfig {
            access_secret: "different-access-secret-at-least-32-chars".to_string(),
            refresh_secret: "different-refresh-secret-at-least-32-chars".to_string(),
            ..get_test_jwt_config()
        });

        assert_eq!(
            other.verify(signed.as_str(), TokenKind::Access),
            Err(AuthFailure::InvalidSignature)
        );
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        let foreign = TokenCodec::new(&JwtConfig {
            issuer: "someone-else".to_string(),
            ..get_test_jwt_config()
        });

        let signed = foreign.issue(&student(), TokenKind::Access).unwrap();

        assert_eq!(
            codec.verify(signed.as_str(), TokenKind::Access),
            Err(AuthFailure::MalformedToken)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = TokenCodec::new(&get_test_jwt_config());

        assert_eq!(
            codec.verify("invalid.token.here", TokenKind::Access),
            Err(AuthFailure::MalformedToken)
        );
        assert_eq!(
            codec.verify("", TokenKind::Access),
            Err(AuthFailure::MalformedToken)
        );
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        let signed = codec.issue(&student(), TokenKind::Access).unwrap();

        let admin = codec
            .issue(&TokenPayload::new(42, Role::Admin), TokenKind::Access)
            .unwrap();

        // Splice the admin claims onto the student's signature.
        let student_parts: Vec<&str> = signed.as_str().split('.').collect();
        let admin_parts: Vec<&str> = admin.as_str().split('.').collect();
        let forged = format!("{}.{}.{}", student_parts[0], admin_parts[1], student_parts[2]);

        assert_eq!(
            codec.verify(&forged, TokenKind::Access),
            Err(AuthFailure::InvalidSignature)
        );
    }

    #[test]
    fn test_tokens_are_unique() {
        let codec = TokenCodec::new(&get_test_jwt_config());

        let first = codec.issue_refresh(&student(), 0).unwrap();
        let second = codec.issue_refresh(&student(), 0).unwrap();

        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_issue_refuses_refresh_without_generation() {
        let codec = TokenCodec::new(&get_test_jwt_config());

        assert!(matches!(
            codec.issue(&student(), TokenKind::Refresh),
            Err(TokenError::UnboundRefresh)
        ));
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let codec = TokenCodec::new(&JwtConfig {
            refresh_token_expiry: i64::MAX,
            ..get_test_jwt_config()
        });

        assert!(matches!(
            codec.issue_refresh(&student(), 0),
            Err(TokenError::ExpiryOutOfRange(i64::MAX))
        ));
    }
}
