//! Middleware and extractors for the authentication pipeline.
//!
//! # Modules
//!
//! - [`auth`]: Access-token guard and the [`AuthUser`](auth::AuthUser) extractor
//! - [`refresh`]: Refresh-token guard for the reissue route only
//! - [`role`]: Role policy table and the authorization guard
//!
//! # Request Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::authenticate`] (or [`refresh::authenticate_refresh`]) introspects
//!    the token and attaches the identity, or rejects with 401
//! 3. [`role::authorize`] compares the identity's role with the operation's
//!    required roles, rejecting with 403 on mismatch
//! 4. The handler reads the identity through an extractor
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn get_profile(AuthUser(requester): AuthUser) -> impl IntoResponse {
//!     Json(requester)
//! }
//! ```

pub mod auth;
pub mod refresh;
pub mod role;
