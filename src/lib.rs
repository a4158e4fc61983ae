//! # pawgate
//!
//! Authentication, session and role-based access gateway for the hospital
//! and business staff dashboards of a pet-services platform.
//!
//! ## Features
//!
//! - **Credential login**: email, password and organization type, verified
//!   against Argon2 hashes
//! - **Signed sessions**: self-contained JWT session cookies with an 8 hour
//!   lifetime and a 15 minute permission refresh window
//! - **Role-based access**: a fixed permission catalog and role map shared
//!   by every authorization check
//! - **Route guard**: dashboard paths require a session; identity is
//!   forwarded to handlers as headers
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use pawgate::{Config, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/pawgate.yaml").await?;
//!     server::run_server(config).await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod server;
pub mod utils;

// Re-export main types
pub use auth::{
    AuthSystem, GuardDecision, IdentityContext, IdentityRecord, IdentityStore,
    InMemoryIdentityStore, LoginCredentials, OrganizationType, Permission, PermissionSet,
    RouteGuard, Session, SessionPolicy, SessionState, UserRole, has_all_permissions,
    has_any_permission, has_permission, permissions_for, require_permission,
};
pub use config::Config;
pub use utils::error::{GatewayError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
