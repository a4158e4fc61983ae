//! Session issuance, refresh and expiry

use super::types::{IdentityContext, Session, SessionPolicy, SessionState};
use crate::auth::rbac::{UserRole, permissions_for};
use crate::auth::store::IdentityRecord;
use crate::utils::error::{GatewayError, Result};
use chrono::{DateTime, SubsecRound, Utc};
use tracing::debug;
use uuid::Uuid;

impl SessionState {
    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;

        matches!(
            (self, next),
            (Unauthenticated, Authenticating)
                | (Authenticating, Authenticated)
                | (Authenticating, Unauthenticated)
                | (Authenticated, Refreshing)
                | (Authenticated, Expired)
                | (Authenticated, Unauthenticated)
                | (Refreshing, Authenticated)
                | (Refreshing, Expired)
                | (Expired, Unauthenticated)
        )
    }

    /// Move to `next`, rejecting illegal transitions
    pub fn transition(self, next: SessionState) -> Result<SessionState> {
        if self.can_transition_to(next) {
            debug!("Session state {:?} -> {:?}", self, next);
            Ok(next)
        } else {
            Err(GatewayError::internal(format!(
                "Illegal session transition {:?} -> {:?}",
                self, next
            )))
        }
    }
}

impl Session {
    /// Issue a fresh session for a verified identity
    pub fn issue(identity: &IdentityRecord, policy: &SessionPolicy, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(0);

        Self {
            user_id: identity.id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            role: identity.role,
            organization_id: identity.organization_id.clone(),
            organization_type: identity.role.organization_type(),
            permissions: permissions_for(identity.role),
            session_id: Uuid::new_v4(),
            issued_at: now,
            refreshed_at: now,
            expires_at: now + policy.max_age,
        }
    }

    /// True once the maximum lifetime has elapsed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// True once the refresh interval has elapsed since the last resolution
    pub fn needs_refresh(&self, policy: &SessionPolicy, now: DateTime<Utc>) -> bool {
        now - self.refreshed_at >= policy.update_age
    }

    /// Where this session stands at `now`
    pub fn state_at(&self, policy: &SessionPolicy, now: DateTime<Utc>) -> SessionState {
        if self.is_expired(now) {
            SessionState::Expired
        } else if self.needs_refresh(policy, now) {
            SessionState::Refreshing
        } else {
            SessionState::Authenticated
        }
    }

    /// Re-resolve the permission set for `role`
    ///
    /// Session id and expiry are kept; a refresh never extends the lifetime.
    pub fn refreshed(&self, role: UserRole, now: DateTime<Utc>) -> Result<Self> {
        if self.is_expired(now) {
            return Err(GatewayError::SessionExpired);
        }

        Ok(Self {
            role,
            organization_type: role.organization_type(),
            permissions: permissions_for(role),
            refreshed_at: now.trunc_subsecs(0),
            ..self.clone()
        })
    }

    /// Seconds left before expiry, zero once expired
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now.trunc_subsecs(0)).num_seconds().max(0)
    }

    pub fn identity_context(&self) -> IdentityContext {
        IdentityContext {
            user_id: self.user_id.clone(),
            role: self.role,
            organization_id: self.organization_id.clone(),
        }
    }
}
