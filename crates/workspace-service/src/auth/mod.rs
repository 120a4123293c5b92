//! Authentication and authorization for the workspace service.
//!
//! Token verification itself lives in `common::AuthenticationContext`. This
//! module supplies the production key store and the role gate handlers call
//! with the request scope produced by the auth middleware.

pub mod key_store;

pub use key_store::PemDirectoryKeyStore;

use crate::errors::WsError;
use common::{Claims, RequestScope};

/// Full administrative access, including token issuance.
pub const ROLE_ADMIN: &str = "ADMIN";

/// Regular user access to projects, workspaces and assets.
pub const ROLE_USER: &str = "USER";

/// Roles allowed to use the project, workspace, asset and stem endpoints.
pub const MEMBER_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_USER];

/// Roles allowed to mint tokens.
pub const ADMIN_ROLES: &[&str] = &[ROLE_ADMIN];

/// Return the authenticated claims if they grant one of `allowed_roles`.
///
/// A scope without claims is a wiring bug (the route skipped the auth
/// middleware) and surfaces as an internal error, not a 401.
pub fn authorize<'a>(scope: &'a RequestScope, allowed_roles: &[&str]) -> Result<&'a Claims, WsError> {
    let claims = scope.claims()?;

    if !claims.authorize_check(allowed_roles) {
        tracing::warn!(
            target: "ws.auth",
            trace_id = %scope.trace_id(),
            roles = ?claims.roles,
            "Caller lacks a required role"
        );
        return Err(WsError::Forbidden(
            "Insufficient permissions for this action".to_string(),
        ));
    }

    Ok(claims)
}
