//! # Registrar Core
//!
//! Core types and errors shared by every Registrar crate.
//!
//! - [`errors`]: HTTP-facing application error with response conversion
//! - [`roles`]: The closed set of application roles and subject identifiers
//!
//! # Example
//!
//! ```ignore
//! use registrar_core::{AppError, Role};
//!
//! let role: Role = "lecturer".parse()?;
//! let error = AppError::forbidden(anyhow::anyhow!("Forbidden"));
//! ```

pub mod errors;
pub mod roles;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use roles::{Role, SubjectId, UnknownRole};
