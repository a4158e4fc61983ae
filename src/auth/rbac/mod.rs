//! Role-Based Access Control (RBAC)
//!
//! Closed permission and role catalogs, the static role→permission table and
//! the [`RbacSystem`] facade that serves lookups from it.

mod catalog;
mod roles;
mod system;
mod types;

pub use catalog::{Permission, PermissionParseError, PermissionSet};
pub use roles::{OrganizationType, UserRole, permissions_for};
pub use system::RbacSystem;
pub use types::RoleDefinition;
