//! HTTP server implementation
//!
//! This module provides the HTTP server, the session guard middleware and
//! the routes.

pub mod builder;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;


pub use builder::{ServerBuilder, run_server};
pub use server::{HttpServer, create_app};
pub use state::AppState;
