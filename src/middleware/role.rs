//! Role-based authorization for authenticated routes.
//!
//! Required roles are declared once at startup in a [`RolePolicy`] table and
//! looked up per operation by method and matched route path. The guard runs
//! after [`authenticate`](crate::middleware::auth::authenticate) and never
//! re-checks the token.
//!
//! Identities carry a single role, so the check is membership of that role
//! in the required set.

use std::collections::{HashMap, HashSet};

use axum::{
    extract::{MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};

use registrar_auth::{AuthFailure, Requester};
use registrar_core::{AppError, Role};

use crate::metrics::track_authorization_check;
use crate::middleware::auth::reject;
use crate::state::AppState;

/// Roles allowed to invoke an operation. Empty means any authenticated caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredRoles(HashSet<Role>);

impl RequiredRoles {
    /// Any authenticated caller.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn permits(&self, requester: &Requester) -> bool {
        self.is_empty() || requester.has_any_role(&self.0)
    }
}

impl FromIterator<Role> for RequiredRoles {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Role; N]> for RequiredRoles {
    fn from(roles: [Role; N]) -> Self {
        roles.into_iter().collect()
    }
}

/// Startup-time table of required roles.
///
/// A handler-level entry set with [`RolePolicy::require`] always wins over a
/// prefix default set with [`RolePolicy::default_for`]. Among defaults, the
/// longest matching prefix wins. Operations with no entry require no role.
///
/// ```rust,ignore
/// let policy = RolePolicy::new()
///     .default_for("/api/departments", [Role::Admin])
///     .require(Method::GET, "/api/departments", RequiredRoles::any());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RolePolicy {
    defaults: Vec<(String, RequiredRoles)>,
    operations: HashMap<(Method, String), RequiredRoles>,
    none: RequiredRoles,
}

impl RolePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the roles required by every operation under `prefix`.
    pub fn default_for(mut self, prefix: &str, roles: impl Into<RequiredRoles>) -> Self {
        let prefix = prefix.trim_end_matches('/').to_string();
        self.defaults.retain(|(p, _)| *p != prefix);
        self.defaults.push((prefix, roles.into()));
        self
    }

    /// Sets the roles required by one operation, overriding any prefix default.
    pub fn require(mut self, method: Method, path: &str, roles: impl Into<RequiredRoles>) -> Self {
        self.operations.insert((method, path.to_string()), roles.into());
        self
    }

    /// Roles required by `method` on the route template `path`.
    ///
    /// `HEAD` is answered by the `GET` handler, so it inherits the `GET`
    /// entry unless it has one of its own.
    pub fn required_roles(&self, method: &Method, path: &str) -> &RequiredRoles {
        if let Some(roles) = self.operation(method, path) {
            return roles;
        }
        if *method == Method::HEAD {
            if let Some(roles) = self.operation(&Method::GET, path) {
                return roles;
            }
        }

        self.defaults
            .iter()
            .filter(|(prefix, _)| path_has_prefix(path, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, roles)| roles)
            .unwrap_or(&self.none)
    }
}

impl RolePolicy {
    fn operation(&self, method: &Method, path: &str) -> Option<&RequiredRoles> {
        self.operations.get(&(method.clone(), path.to_string()))
    }
}

/// Segment-aware prefix match: `/api/students` covers `/api/students/{id}`
/// but not `/api/studentship`.
fn path_has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => prefix.is_empty() || rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Checks a requester against the required set.
pub fn check_required_roles(
    requester: &Requester,
    required: &RequiredRoles,
) -> Result<(), AuthFailure> {
    if required.permits(requester) {
        Ok(())
    } else {
        Err(AuthFailure::InsufficientRole)
    }
}

/// Middleware enforcing the [`RolePolicy`] held in [`AppState`].
///
/// Must be layered inside [`authenticate`](crate::middleware::auth::authenticate).
/// If no identity is present the request fails closed with Unauthorized.
pub async fn authorize(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let decision = {
        let Some(requester) = req.extensions().get::<Requester>() else {
            error!(path = %req.uri().path(), "Authorization reached without authentication guard");
            return Err(reject(AuthFailure::MissingCredential));
        };

        let path = req
            .extensions()
            .get::<MatchedPath>()
            .map(|p| p.as_str())
            .unwrap_or_else(|| req.uri().path());
        let required = state.role_policy.required_roles(req.method(), path);
        let decision = check_required_roles(requester, required);

        track_authorization_check(decision.is_ok(), requester.role().as_str());
        match &decision {
            Ok(()) => debug!(
                subject_id = requester.subject_id(),
                role = %requester.role(),
                path = %path,
                "Authorization granted"
            ),
            Err(_) => warn!(
                subject_id = requester.subject_id(),
                role = %requester.role(),
                required = ?required,
                path = %path,
                "Authorization denied"
            ),
        }
        decision
    };

    decision.map_err(reject)?;
    Ok(next.run(req).await)
}
