//! Error handling for pawgate
//!
//! One crate-wide error type, its HTTP mapping and the `Result` alias used
//! throughout the gateway.

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{GatewayError, Result};
