//! Identity store
//!
//! Login and refresh look identities up through [`IdentityStore`], which is
//! handed to [`super::AuthSystem`] explicitly. Tests substitute fixtures or a
//! mock; the service seeds an [`InMemoryIdentityStore`] from configuration.

use crate::auth::rbac::{OrganizationType, UserRole};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Stored staff identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Stable user identifier
    pub id: String,
    /// Login email
    pub email: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Argon2 PHC string
    pub password_hash: String,
    /// Assigned role
    pub role: UserRole,
    /// Organization (tenant) the user belongs to
    pub organization_id: String,
    /// Inactive accounts cannot log in or refresh
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl IdentityRecord {
    pub fn organization_type(&self) -> OrganizationType {
        self.role.organization_type()
    }

    /// Login match: same email, same organization type, account active
    pub fn matches_login(&self, email: &str, organization_type: OrganizationType) -> bool {
        self.email.eq_ignore_ascii_case(email)
            && self.organization_type() == organization_type
            && self.is_active
    }
}

/// Lookup interface for staff identities
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Find the active identity with this login email within one
    /// organization type
    async fn find_by_email(
        &self,
        email: &str,
        organization_type: OrganizationType,
    ) -> Result<Option<IdentityRecord>>;

    /// Find an identity by id
    async fn find_by_id(&self, id: &str) -> Result<Option<IdentityRecord>>;
}

/// In-memory identity store
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    identities: RwLock<HashMap<String, IdentityRecord>>,
}

impl InMemoryIdentityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with identities; duplicate ids are rejected
    pub fn with_identities(identities: impl IntoIterator<Item = IdentityRecord>) -> Result<Self> {
        let store = Self::new();
        for identity in identities {
            store.insert(identity)?;
        }
        Ok(store)
    }

    /// Insert a new identity
    ///
    /// Ids are unique, and so is each (email, organization type) login pair.
    pub fn insert(&self, identity: IdentityRecord) -> Result<()> {
        let mut identities = self.identities.write();
        if identities.contains_key(&identity.id) {
            return Err(GatewayError::store(format!(
                "Duplicate identity id: {}",
                identity.id
            )));
        }
        if let Some(existing) = identities.values().find(|existing| {
            existing.email.eq_ignore_ascii_case(&identity.email)
                && existing.organization_type() == identity.organization_type()
        }) {
            return Err(GatewayError::store(format!(
                "Identity {} reuses the login of identity {}",
                identity.id, existing.id
            )));
        }
        debug!("Registered identity {} ({})", identity.id, identity.role);
        identities.insert(identity.id.clone(), identity);
        Ok(())
    }

    /// Change the role of an identity
    pub fn set_role(&self, id: &str, role: UserRole) -> Result<()> {
        let mut identities = self.identities.write();
        let identity = identities
            .get_mut(id)
            .ok_or_else(|| GatewayError::store(format!("Unknown identity: {}", id)))?;
        identity.role = role;
        Ok(())
    }

    /// Activate or deactivate an identity
    pub fn set_active(&self, id: &str, is_active: bool) -> Result<()> {
        let mut identities = self.identities.write();
        let identity = identities
            .get_mut(id)
            .ok_or_else(|| GatewayError::store(format!("Unknown identity: {}", id)))?;
        identity.is_active = is_active;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.identities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.read().is_empty()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_email(
        &self,
        email: &str,
        organization_type: OrganizationType,
    ) -> Result<Option<IdentityRecord>> {
        Ok(self
            .identities
            .read()
            .values()
            .find(|identity| identity.matches_login(email, organization_type))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<IdentityRecord>> {
        Ok(self.identities.read().get(id).cloned())
    }
}
