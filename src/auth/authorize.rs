//! Authorization predicate
//!
//! Checks only ever read the session's permission snapshot. An absent session
//! fails every check.

use crate::auth::rbac::Permission;
use crate::auth::session::Session;
use crate::utils::error::{GatewayError, Result};
use crate::utils::logging::SecurityLogger;
use tracing::debug;

/// Whether the session holds `permission`
pub fn has_permission(session: Option<&Session>, permission: Permission) -> bool {
    match session {
        Some(session) => {
            let granted = session.permissions.contains(permission);
            if !granted {
                SecurityLogger::log_authz_event(Some(session.session_id), permission.as_str(), false);
            }
            granted
        }
        None => false,
    }
}

/// Whether the session holds at least one of `permissions`
pub fn has_any_permission(session: Option<&Session>, permissions: &[Permission]) -> bool {
    session.is_some_and(|session| {
        let granted = permissions
            .iter()
            .any(|&permission| session.permissions.contains(permission));
        if !granted {
            debug!(
                "Session {} ({}) holds none of {} permissions",
                session.session_id,
                session.role,
                permissions.len()
            );
        }
        granted
    })
}

/// Whether the session holds every one of `permissions`
///
/// An empty list is satisfied by any present session.
pub fn has_all_permissions(session: Option<&Session>, permissions: &[Permission]) -> bool {
    session.is_some_and(|session| {
        permissions
            .iter()
            .all(|&permission| has_permission(Some(session), permission))
    })
}

/// Error-returning form of [`has_permission`] for request handlers
pub fn require_permission(session: Option<&Session>, permission: Permission) -> Result<()> {
    match session {
        None => Err(GatewayError::unauthorized("Authentication required")),
        Some(_) if has_permission(session, permission) => Ok(()),
        Some(_) => Err(GatewayError::forbidden(format!(
            "Missing permission: {}",
            permission
        ))),
    }
}
