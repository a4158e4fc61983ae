//! Security-aware logging utilities
//!
//! Authentication events are emitted under the `security` target with
//! structured fields. Credentials and tokens are never logged.

use tracing::{debug, info, warn};
use uuid::Uuid;

/// Authentication event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    Login,
    Logout,
    Refresh,
    Update,
    Expired,
}

impl AuthEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEvent::Login => "login",
            AuthEvent::Logout => "logout",
            AuthEvent::Refresh => "refresh",
            AuthEvent::Update => "update",
            AuthEvent::Expired => "expired",
        }
    }
}

/// Security-aware logging utilities
pub struct SecurityLogger;

impl SecurityLogger {
    /// Log authentication events
    pub fn log_auth_event(
        event: AuthEvent,
        success: bool,
        user_id: Option<&str>,
        session_id: Option<Uuid>,
    ) {
        let user_id = user_id.unwrap_or("-");
        let session_id = session_id.map(|id| id.to_string()).unwrap_or_default();

        if success {
            info!(
                target: "security",
                event = event.as_str(),
                success,
                user_id,
                session_id = %session_id,
                "Authentication success: {}",
                event.as_str()
            );
        } else {
            warn!(
                target: "security",
                event = event.as_str(),
                success,
                user_id,
                session_id = %session_id,
                "Authentication failure: {}",
                event.as_str()
            );
        }
    }

    /// Log authorization decisions
    pub fn log_authz_event(session_id: Option<Uuid>, permission: &str, granted: bool) {
        let session_id = session_id.map(|id| id.to_string()).unwrap_or_default();

        if granted {
            debug!(target: "security", session_id = %session_id, permission, granted, "Authorization granted");
        } else {
            debug!(target: "security", session_id = %session_id, permission, granted, "Authorization denied");
        }
    }
}
