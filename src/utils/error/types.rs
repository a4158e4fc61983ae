//! Error type definitions

use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Login failed. Deliberately carries no reason.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Session is past its maximum lifetime or can no longer be refreshed
    #[error("Session expired")]
    SessionExpired,

    /// Missing or mismatched double-submit CSRF token
    #[error("Invalid CSRF token")]
    CsrfMismatch,

    /// Unauthorized errors (no usable session)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden errors (session lacks a permission)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Identity store errors
    #[error("Identity store error: {0}")]
    Store(String),

    /// JWT errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Crypto errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
