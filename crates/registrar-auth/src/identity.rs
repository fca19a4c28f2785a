//! Authenticated identities attached to a request.
//!
//! Neither type can be built outside this crate. The only way to obtain one
//! is a successful [`IntrospectionResult`](crate::IntrospectionResult), which
//! in turn only comes from [`TokenIntrospector`](crate::TokenIntrospector)
//! verifying a real token. An identity in request context therefore always
//! means the token was verified.
//!
//! None of these compile outside the crate:
//!
//! ```compile_fail
//! use registrar_auth::{Requester, TokenPayload};
//! use registrar_core::Role;
//!
//! let forged = Requester::new(TokenPayload::new(1, Role::Admin));
//! ```
//!
//! ```compile_fail
//! use registrar_auth::{TokenKind, TokenPayload, VerifiedToken};
//! use registrar_core::Role;
//!
//! let forged = VerifiedToken {
//!     payload: TokenPayload::new(1, Role::Admin),
//!     kind: TokenKind::Access,
//!     issued_at: 0,
//!     expires_at: 0,
//!     token_id: String::new(),
//!     generation: 0,
//! };
//! ```
//!
//! ```compile_fail
//! use registrar_auth::{AuthFailure, IntrospectionResult, VerifiedToken};
//!
//! let verdict: Result<VerifiedToken, AuthFailure> = Err(AuthFailure::Expired);
//! let result = IntrospectionResult::from(verdict);
//! ```

use registrar_core::{Role, SubjectId};
use serde::Serialize;

use crate::claims::TokenPayload;

/// Caller authenticated with an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requester {
    subject_id: SubjectId,
    role: Role,
}

impl Requester {
    pub(crate) fn new(payload: TokenPayload) -> Self {
        Self {
            subject_id: payload.subject_id,
            role: payload.role,
        }
    }

    pub fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn payload(&self) -> TokenPayload {
        TokenPayload::new(self.subject_id, self.role)
    }

    /// Check if the caller holds `role`
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Check if the caller holds any of `roles`
    pub fn has_any_role<'a, I>(&self, roles: I) -> bool
    where
        I: IntoIterator<Item = &'a Role>,
    {
        roles.into_iter().any(|r| self.has_role(*r))
    }
}

/// Caller authenticated with a refresh token. Only the token reissue
/// operation accepts this identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRequester {
    payload: TokenPayload,
    generation: u64,
}

impl RefreshRequester {
    pub(crate) fn new(payload: TokenPayload, generation: u64) -> Self {
        Self {
            payload,
            generation,
        }
    }

    pub fn subject_id(&self) -> SubjectId {
        self.payload.subject_id
    }

    pub fn payload(&self) -> TokenPayload {
        self.payload
    }

    /// Revocation generation the presented refresh token was minted under.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
