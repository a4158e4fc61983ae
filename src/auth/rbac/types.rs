//! RBAC type definitions

use super::catalog::PermissionSet;
use super::roles::{OrganizationType, UserRole};
use serde::Serialize;

/// Role definition as served by [`super::RbacSystem`]
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    /// Role identity
    pub role: UserRole,
    /// Role description
    pub description: &'static str,
    /// Organization type the role is scoped to
    pub organization_type: OrganizationType,
    /// Permissions granted by this role
    pub permissions: PermissionSet,
}
