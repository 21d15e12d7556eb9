//! API-side authorization guard.
//!
//! Role checks happen at the handler boundary; the engine crates stay
//! auth-agnostic.

use axum::http::StatusCode;

use crate::app::errors;
use crate::context::PrincipalContext;

/// Reject the request unless the principal carries the `admin` role.
pub fn require_admin(principal: &PrincipalContext) -> Result<(), axum::response::Response> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "admin role required",
        ))
    }
}
