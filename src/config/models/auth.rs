//! Authentication configuration

use crate::auth::session::SessionPolicy;
use super::Environment;
use actix_web::cookie::SameSite;
use chrono::Duration;
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret; generated at startup when unset
    #[serde(default)]
    pub jwt_secret: String,
    /// Token issuer
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Token audience
    #[serde(default = "default_audience")]
    pub audience: String,
    /// Maximum session lifetime in seconds
    #[serde(default = "default_session_max_age")]
    pub session_max_age: u64,
    /// Permission refresh interval in seconds
    #[serde(default = "default_session_update_age")]
    pub session_update_age: u64,
    /// Session cookie settings
    #[serde(default)]
    pub cookie: CookieConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: generate_secure_jwt_secret(),
            issuer: default_issuer(),
            audience: default_audience(),
            session_max_age: default_session_max_age(),
            session_update_age: default_session_update_age(),
            cookie: CookieConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Merge auth configurations
    pub fn merge(mut self, other: Self) -> Self {
        if !other.jwt_secret.is_empty() && !is_placeholder_secret(&other.jwt_secret) {
            self.jwt_secret = other.jwt_secret;
        }
        if other.issuer != default_issuer() {
            self.issuer = other.issuer;
        }
        if other.audience != default_audience() {
            self.audience = other.audience;
        }
        if other.session_max_age != default_session_max_age() {
            self.session_max_age = other.session_max_age;
        }
        if other.session_update_age != default_session_update_age() {
            self.session_update_age = other.session_update_age;
        }
        self.cookie = other.cookie;
        self
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long for security".to_string());
        }

        if is_placeholder_secret(&self.jwt_secret) {
            return Err(
                "JWT secret must not use default values. Please generate a secure random secret."
                    .to_string(),
            );
        }

        if self.jwt_secret.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(
                "JWT secret should contain mixed case letters, numbers, and special characters"
                    .to_string(),
            );
        }

        if self.issuer.is_empty() || self.audience.is_empty() {
            return Err("Token issuer and audience cannot be empty".to_string());
        }

        if self.session_max_age < 300 {
            return Err("Session lifetime should be at least 5 minutes (300 seconds)".to_string());
        }

        if self.session_max_age > 86400 * 30 {
            return Err("Session lifetime should not exceed 30 days".to_string());
        }

        if self.session_update_age == 0 || self.session_update_age >= self.session_max_age {
            return Err("Session refresh interval must be positive and shorter than the session lifetime".to_string());
        }

        if self.cookie.name.is_empty() {
            return Err("Session cookie name cannot be empty".to_string());
        }

        if self.cookie.csrf_name.is_empty() || self.cookie.csrf_name == self.cookie.name {
            return Err("CSRF cookie name must be set and differ from the session cookie".to_string());
        }

        Ok(())
    }

    /// Generate a signing secret if none was configured
    pub fn ensure_secret(&mut self) {
        if self.jwt_secret.is_empty() {
            warn!(
                "No JWT secret configured; generated a random one. Sessions will not survive a restart."
            );
            self.jwt_secret = generate_secure_jwt_secret();
        }
    }

    /// Session lifetime policy
    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            max_age: Duration::seconds(self.session_max_age as i64),
            update_age: Duration::seconds(self.session_update_age as i64),
        }
    }

    /// Whether the session cookie carries the Secure flag
    pub fn cookie_secure(&self, environment: Environment) -> bool {
        self.cookie.secure.unwrap_or(environment.is_production())
    }
}

/// SameSite policy for the session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    Strict,
    #[default]
    Lax,
    None,
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        }
    }
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Cookie name
    #[serde(default = "default_cookie_name")]
    pub name: String,
    /// Cookie path
    #[serde(default = "default_cookie_path")]
    pub path: String,
    /// SameSite policy
    #[serde(default)]
    pub same_site: SameSitePolicy,
    /// Force the Secure flag; derived from the environment when unset
    #[serde(default)]
    pub secure: Option<bool>,
    /// Name of the double-submit CSRF cookie
    #[serde(default = "default_csrf_cookie_name")]
    pub csrf_name: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            path: default_cookie_path(),
            same_site: SameSitePolicy::default(),
            secure: None,
            csrf_name: default_csrf_cookie_name(),
        }
    }
}

fn default_issuer() -> String {
    "pawgate".to_string()
}

fn default_audience() -> String {
    "pet-dashboards".to_string()
}

fn default_session_max_age() -> u64 {
    60 * 60 * 8
}

fn default_session_update_age() -> u64 {
    60 * 15
}

fn default_cookie_name() -> String {
    "pawgate.session-token".to_string()
}

fn default_csrf_cookie_name() -> String {
    "pawgate.csrf-token".to_string()
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn is_placeholder_secret(secret: &str) -> bool {
    matches!(secret, "your-secret-key" | "change-me" | "changeme")
}

/// Generate a secure random JWT secret
fn generate_secure_jwt_secret() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
