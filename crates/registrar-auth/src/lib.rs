//! # Registrar Auth
//!
//! Token issuance, introspection and revocation for the Registrar API.
//!
//! This crate provides:
//!
//! - [`claims`]: Token kinds, the signed claim set and the verified payload
//! - [`jwt`]: [`TokenCodec`], which signs and verifies both token kinds
//! - [`revocation`]: The [`RevocationStore`] contract and an in-process store
//! - [`introspection`]: [`TokenIntrospector`], which turns a raw token into a verdict
//! - [`issuer`]: [`TokenIssuer`], which mints token pairs and revokes subjects
//! - [`identity`]: The authenticated [`Requester`] handed to request handlers
//!
//! # Token Types
//!
//! - **Access Token**: Short-lived, verified purely cryptographically.
//! - **Refresh Token**: Long-lived, additionally checked against the subject's
//!   revocation generation.
//!
//! The two kinds are signed with independent secrets, so one can never be
//! accepted in place of the other.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use registrar_auth::{InMemoryRevocationStore, TokenCodec, TokenIntrospector, TokenIssuer, TokenPayload};
//! use registrar_core::Role;
//!
//! let codec = Arc::new(TokenCodec::new(&jwt_config));
//! let store = Arc::new(InMemoryRevocationStore::new());
//! let issuer = TokenIssuer::new(codec.clone(), store.clone(), timeout);
//! let introspector = TokenIntrospector::new(codec, store, timeout);
//!
//! let pair = issuer.issue_pair(TokenPayload::new(42, Role::Student)).await?;
//! let verdict = introspector.introspect_access(&pair.access_token);
//! assert!(verdict.is_ok());
//! ```

pub mod claims;
pub mod error;
pub mod identity;
pub mod introspection;
pub mod issuer;
pub mod jwt;
pub mod revocation;

// Re-export commonly used types at crate root
pub use claims::{Claims, SignedToken, TokenKind, TokenPayload, VerifiedToken};
pub use error::{AuthFailure, StoreError, TokenError};
pub use identity::{RefreshRequester, Requester};
pub use introspection::{IntrospectionResult, TokenIntrospector};
pub use issuer::{TokenIssuer, TokenPair};
pub use jwt::TokenCodec;
pub use revocation::{InMemoryRevocationStore, RevocationStore};
