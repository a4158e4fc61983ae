//! Authentication and authorization system
//!
//! Login, session lifecycle, role-based permissions and the route guard for
//! the staff dashboards.

pub mod authorize;
pub mod cookie;
pub mod credentials;
pub mod csrf;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;
pub mod store;
mod system;

pub use authorize::{has_all_permissions, has_any_permission, has_permission, require_permission};
pub use credentials::LoginCredentials;
pub use guard::{GuardDecision, RouteGuard};
pub use rbac::{OrganizationType, Permission, PermissionSet, UserRole, permissions_for};
pub use session::{IdentityContext, Session, SessionPolicy, SessionState};
pub use store::{IdentityRecord, IdentityStore, InMemoryIdentityStore};
pub use system::AuthSystem;
