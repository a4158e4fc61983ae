//! Server builder and run_server function

use crate::auth::IdentityStore;
use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;
use tracing::info;

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    store: Option<Arc<dyn IdentityStore>>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use an identity store instead of the configured seed identities
    pub fn with_store(mut self, store: Arc<dyn IdentityStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::config("Configuration is required"))?;

        match self.store {
            Some(store) => HttpServer::with_store(&config, store),
            None => HttpServer::new(&config),
        }
    }
}

/// Load configuration from `path`, falling back to defaults plus environment
/// overrides when the file does not exist
pub async fn load_config(path: &str) -> Result<Config> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        Config::from_file(path).await
    } else {
        info!("Configuration file {} not found, using defaults", path);
        Config::from_env()
    }
}

/// Run the server with the given configuration
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting pawgate {}", env!("CARGO_PKG_VERSION"));

    let server = ServerBuilder::new().with_config(config).build()?;
    let address = server.config().address();

    info!("Server starting at: http://{}", address);
    info!("Endpoints:");
    info!("   GET  /health - Health check");
    info!("   GET  /login - Login page");
    info!("   POST /api/auth/login - Log in");
    info!("   POST /api/auth/logout - Log out");
    info!("   GET  /api/auth/session - Current session");
    info!("   POST /api/auth/session/update - Re-resolve permissions");
    info!("   GET  /api/auth/permissions/{{permission}} - Permission check");
    info!("   GET  /dashboard - Protected dashboard");

    server.start().await
}
