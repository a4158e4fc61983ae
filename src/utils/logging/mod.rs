//! Logging setup and security event logging

mod init;
mod security;

pub use init::init_tracing;
pub use security::{AuthEvent, SecurityLogger};
