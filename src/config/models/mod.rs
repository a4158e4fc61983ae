//! Configuration data models

pub mod auth;
pub mod guard;
pub mod logging;
pub mod server;

pub use auth::*;
pub use guard::*;
pub use logging::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    3100
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    64 * 1024
}
