//! HTTP server core implementation

use crate::auth::{AuthSystem, IdentityStore, InMemoryIdentityStore};
use crate::config::{Config, ServerConfig};
use crate::server::middleware::{RequestIdMiddleware, SessionGuardMiddleware};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a server backed by the identities listed in `config`
    pub fn new(config: &Config) -> Result<Self> {
        let store = InMemoryIdentityStore::with_identities(config.identities.clone())?;
        info!("Loaded {} identities", store.len());
        Self::with_store(config, Arc::new(store))
    }

    /// Create a server backed by an explicit identity store
    pub fn with_store(config: &Config, store: Arc<dyn IdentityStore>) -> Result<Self> {
        info!("Creating HTTP server");

        let auth = AuthSystem::new(&config.auth, store)?;
        let state = AppState::new(config.clone(), auth);

        Ok(Self {
            config: config.server.clone(),
            state,
        })
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);
        let mut server = ActixHttpServer::new(move || create_app(state.clone()));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| GatewayError::config(format!("Failed to bind {}: {}", bind_addr, e)))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| GatewayError::internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Create the Actix-web application
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    debug!("Setting up routes and middleware");

    let body_limit = state.config.server.max_body_size;

    // Only the login endpoint takes a body; any unreadable body is a failed login.
    let json_config = web::JsonConfig::default()
        .limit(body_limit)
        .error_handler(|err, _req| {
            debug!("Rejected JSON body: {}", err);
            GatewayError::InvalidCredentials.into()
        });
    let form_config = web::FormConfig::default()
        .limit(body_limit)
        .error_handler(|err, _req| {
            debug!("Rejected form body: {}", err);
            GatewayError::InvalidCredentials.into()
        });

    App::new()
        .app_data(state)
        .app_data(json_config)
        .app_data(form_config)
        .wrap(SessionGuardMiddleware)
        .wrap(RequestIdMiddleware)
        .wrap(TracingLogger::default())
        .wrap(DefaultHeaders::new().add(("Server", "pawgate")))
        .configure(routes::configure_routes)
}
