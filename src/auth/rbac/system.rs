//! RBAC system core functionality

use std::collections::HashMap;
use tracing::{debug, info};

use super::catalog::Permission;
use super::roles::{OrganizationType, UserRole, permissions_for};
use super::types::RoleDefinition;

/// Read-only view over the role→permission table
///
/// Built once at startup and shared behind an `Arc`; nothing mutates it
/// afterwards.
#[derive(Debug, Clone)]
pub struct RbacSystem {
    /// Role definitions
    pub(super) roles: HashMap<UserRole, RoleDefinition>,
}

impl RbacSystem {
    /// Create a new RBAC system
    pub fn new() -> Self {
        info!("Initializing RBAC system");

        let roles: HashMap<UserRole, RoleDefinition> = UserRole::ALL
            .iter()
            .map(|&role| {
                let definition = RoleDefinition {
                    role,
                    description: role.description(),
                    organization_type: role.organization_type(),
                    permissions: permissions_for(role),
                };
                debug!(
                    "Role {} grants {} permissions",
                    role,
                    definition.permissions.len()
                );
                (role, definition)
            })
            .collect();

        info!(
            "RBAC system initialized with {} roles and {} permissions",
            roles.len(),
            Permission::ALL.len()
        );

        Self { roles }
    }

    /// Get role by identity
    pub fn get_role(&self, role: UserRole) -> Option<&RoleDefinition> {
        self.roles.get(&role)
    }

    /// List all roles, catalog order
    pub fn list_roles(&self) -> Vec<&RoleDefinition> {
        UserRole::ALL
            .iter()
            .filter_map(|role| self.roles.get(role))
            .collect()
    }

    /// List all permissions
    pub fn list_permissions(&self) -> &'static [Permission] {
        Permission::ALL
    }

    /// Roles scoped to one organization type
    pub fn roles_for_organization(&self, organization_type: OrganizationType) -> Vec<UserRole> {
        UserRole::ALL
            .iter()
            .copied()
            .filter(|role| role.organization_type() == organization_type)
            .collect()
    }
}

impl Default for RbacSystem {
    fn default() -> Self {
        Self::new()
    }
}
