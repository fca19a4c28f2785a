//! # Registrar
//!
//! Authentication and authorization gateway for the academic administration
//! API, built with Axum.
//!
//! ## Overview
//!
//! Every protected request passes through a short pipeline:
//!
//! ```text
//! Authorization: Bearer <token>
//!     ↓ authenticate / authenticate_refresh   (401 on any token problem)
//! Requester attached to the request
//!     ↓ authorize                             (403 when the role is not allowed)
//! Handler
//! ```
//!
//! Access tokens are verified purely cryptographically. Refresh tokens are
//! additionally checked against a per-subject revocation generation held in
//! a [`RevocationStore`](registrar_auth::RevocationStore), in memory or in
//! Redis.
//!
//! ## Workspace
//!
//! ```text
//! crates/
//! ├── registrar-core/     # Role, SubjectId, AppError
//! ├── registrar-config/   # Environment configuration
//! ├── registrar-auth/     # Token codec, introspection, issuance, revocation
//! ├── registrar-cache/    # Redis revocation store
//! └── registrar-cli/      # Operator CLI
//! src/
//! ├── middleware/         # Guards and extractors
//! ├── modules/auth/       # Refresh, logout and me endpoints
//! ├── policy.rs           # Required roles per operation
//! ├── router.rs           # Main application router
//! └── state.rs            # Shared application state
//! ```
//!
//! ## Environment Variables
//!
//! ```bash
//! JWT_ACCESS_SECRET=at-least-32-bytes-of-random-data
//! JWT_REFRESH_SECRET=a-different-32-bytes-of-random-data
//! JWT_ACCESS_EXPIRY=900
//! JWT_REFRESH_EXPIRY=604800
//! REVOCATION_BACKEND=redis
//! REDIS_URL=redis://127.0.0.1:6379
//! ```

pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod policy;
pub mod router;
pub mod state;

// Re-export workspace crates for convenience
pub use registrar_auth;
pub use registrar_cache;
pub use registrar_config;
pub use registrar_core;
