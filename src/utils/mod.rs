//! Utility modules
//!
//! - **error**: crate error type and HTTP error responses
//! - **logging**: tracing setup and security event logging

pub mod error;
pub mod logging;
