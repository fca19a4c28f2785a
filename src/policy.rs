//! Required roles for the academic API surface.
//!
//! Business routes are mounted by their own modules; this table is the single
//! place their role requirements are declared.

use axum::http::Method;
use registrar_core::Role;

use crate::middleware::role::{RequiredRoles, RolePolicy};

pub fn default_role_policy() -> RolePolicy {
    RolePolicy::new()
        // Reference data: readable by everyone, maintained by admins.
        .default_for("/api/fields", [Role::Admin])
        .require(Method::GET, "/api/fields", RequiredRoles::any())
        .require(Method::GET, "/api/fields/{id}", RequiredRoles::any())
        .default_for("/api/departments", [Role::Admin])
        .require(Method::GET, "/api/departments", RequiredRoles::any())
        .require(Method::GET, "/api/departments/{id}", RequiredRoles::any())
        // Student records.
        .default_for("/api/students", [Role::Admin])
        .require(Method::GET, "/api/students", [Role::Admin, Role::Lecturer])
        .require(Method::GET, "/api/students/{id}", [Role::Admin, Role::Lecturer])
        // Students submit their own preferences; staff review them.
        .default_for("/api/enrollment-preferences", [Role::Student])
        .require(
            Method::GET,
            "/api/enrollment-preferences",
            [Role::Student, Role::Lecturer, Role::Admin],
        )
}
