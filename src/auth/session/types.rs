//! Session type definitions

use crate::auth::rbac::{OrganizationType, PermissionSet, UserRole};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated principal with a time-bounded permission snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// User identifier
    pub user_id: String,
    /// Login email
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Role at issuance or last refresh
    pub role: UserRole,
    /// Organization (tenant) identifier
    pub organization_id: String,
    /// Organization type
    pub organization_type: OrganizationType,
    /// Permission snapshot; not re-derived until refresh
    pub permissions: PermissionSet,
    /// Session identifier, fixed for the session's lifetime
    pub session_id: Uuid,
    /// Issuance time
    pub issued_at: DateTime<Utc>,
    /// Last time permissions were resolved
    pub refreshed_at: DateTime<Utc>,
    /// Hard end of the session
    pub expires_at: DateTime<Utc>,
}

/// Identity annotations handed to downstream handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityContext {
    pub user_id: String,
    pub role: UserRole,
    pub organization_id: String,
}

/// Session lifetime policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Maximum lifetime from issuance
    pub max_age: Duration,
    /// Permission refresh interval
    pub update_age: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::hours(8),
            update_age: Duration::minutes(15),
        }
    }
}

/// Authentication state of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Refreshing,
    Expired,
}
