//! Application state shared across HTTP handlers

use crate::auth::{AuthSystem, RouteGuard};
use crate::config::Config;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc for cheap sharing across worker threads.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    /// Authentication system
    pub auth: Arc<AuthSystem>,
    /// Route guard
    pub guard: Arc<RouteGuard>,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Config, auth: AuthSystem) -> Self {
        let guard = RouteGuard::new(config.guard.clone());

        Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            guard: Arc::new(guard),
        }
    }

    /// Whether session cookies carry the Secure flag
    pub fn cookie_secure(&self) -> bool {
        self.config
            .auth
            .cookie_secure(self.config.server.environment)
    }
}
