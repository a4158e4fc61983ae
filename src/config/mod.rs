//! Configuration management for pawgate
//!
//! Loading, environment overrides, merging and validation of the service
//! configuration.

pub mod models;

pub use models::*;

use crate::auth::store::IdentityRecord;
use crate::utils::error::{GatewayError, Result};
use actix_web::http::header::HeaderValue;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/pawgate.yaml";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Session and token settings
    #[serde(default)]
    pub auth: AuthConfig,
    /// Route guard settings
    #[serde(default)]
    pub guard: GuardConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Seed identities for the in-memory store
    #[serde(default)]
    pub identities: Vec<IdentityRecord>,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    ///
    /// Environment overrides apply on top of the file.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| GatewayError::config(format!("Failed to parse config: {}", e)))?;

        let mut config = config.with_env_overrides()?;
        config.auth.ensure_secret();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_yaml("{}")
    }

    /// Apply `PAWGATE_*` environment overrides
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(secret) = std::env::var("PAWGATE_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(host) = std::env::var("PAWGATE_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PAWGATE_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| GatewayError::config(format!("Invalid PAWGATE_PORT: {}", port)))?;
        }
        if let Ok(environment) = std::env::var("PAWGATE_ENV") {
            self.server.environment = environment.parse().map_err(GatewayError::config)?;
        }
        Ok(self)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| GatewayError::config(format!("Server config error: {}", e)))?;

        self.auth
            .validate()
            .map_err(|e| GatewayError::config(format!("Auth config error: {}", e)))?;

        self.guard
            .validate()
            .map_err(|e| GatewayError::config(format!("Guard config error: {}", e)))?;

        self.validate_identities()
            .map_err(|e| GatewayError::config(format!("Identity config error: {}", e)))?;

        if self.server.environment.is_production() && self.auth.cookie.secure == Some(false) {
            warn!("Session cookie is not marked Secure in production");
        }

        debug!("Configuration validation completed");
        Ok(())
    }

    fn validate_identities(&self) -> std::result::Result<(), String> {
        if self.identities.is_empty() {
            warn!("No identities configured; every login will fail");
        }

        let mut ids = HashSet::new();
        let mut logins = HashSet::new();
        for identity in &self.identities {
            if !ids.insert(identity.id.as_str()) {
                return Err(format!("Duplicate identity id: {}", identity.id));
            }
            if identity.email.trim().is_empty() {
                return Err(format!("Identity {} has no email", identity.id));
            }
            if !logins.insert((
                identity.email.trim().to_ascii_lowercase(),
                identity.organization_type(),
            )) {
                return Err(format!(
                    "Identity {} reuses an email already registered for {}",
                    identity.id,
                    identity.organization_type()
                ));
            }
            // Forwarded to handlers as x-user-id and x-org-id.
            for (field, value) in [("id", &identity.id), ("organization_id", &identity.organization_id)] {
                if value.is_empty() || HeaderValue::from_str(value).is_err() {
                    return Err(format!(
                        "Identity {} has an {} that cannot be sent as a header",
                        identity.id, field
                    ));
                }
            }
            if !identity.password_hash.starts_with("$argon2") {
                return Err(format!(
                    "Identity {} password_hash must be an Argon2 PHC string",
                    identity.id
                ));
            }
        }
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.server = self.server.merge(other.server);
        self.auth = self.auth.merge(other.auth);
        self.guard = self.guard.merge(other.guard);
        self.logging = self.logging.merge(other.logging);
        if !other.identities.is_empty() {
            self.identities = other.identities;
        }
        self
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| GatewayError::config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaA";

    #[tokio::test]
    async fn test_config_from_file() {
        let config_content = format!(
            r#"
server:
  host: "127.0.0.1"
  port: 3100
  environment: production

auth:
  jwt_secret: "Test-Secret-That-Is-At-Least-32-Characters-Long"
  session_max_age: 28800
  session_update_age: 900

guard:
  protected_prefix: /dashboard

identities:
  - id: "1"
    email: admin@hospital.com
    name: Hospital Admin
    password_hash: "{HASH}"
    role: HOSPITAL_ADMIN
    organization_id: hosp-001
"#
        );

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::from_file(temp_file.path()).await.unwrap();

        assert_eq!(config.server.address(), "127.0.0.1:3100");
        assert!(config.server.environment.is_production());
        assert!(config.auth.cookie_secure(config.server.environment));
        assert_eq!(config.identities.len(), 1);
        assert_eq!(config.guard.login_path, "/login");
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let result = Config::from_file("/nonexistent/pawgate.yaml").await;
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_uses_defaults_and_generated_secret() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.auth.jwt_secret.len(), 64);
        assert_eq!(config.server.port, 3100);
        assert_eq!(config.auth.session_max_age, 8 * 3600);
        assert_eq!(config.auth.session_update_age, 15 * 60);
    }

    #[test]
    fn test_duplicate_identity_ids_rejected() {
        let yaml = format!(
            r#"
identities:
  - {{ id: "1", email: a@hospital.com, password_hash: "{HASH}", role: HOSPITAL_STAFF, organization_id: h }}
  - {{ id: "1", email: b@hospital.com, password_hash: "{HASH}", role: HOSPITAL_VET, organization_id: h }}
"#
        );
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    fn test_duplicate_login_rejected() {
        let yaml = format!(
            r#"
identities:
  - {{ id: "1", email: vet@hospital.com, password_hash: "{HASH}", role: HOSPITAL_VET, organization_id: h, is_active: false }}
  - {{ id: "2", email: Vet@Hospital.com, password_hash: "{HASH}", role: HOSPITAL_STAFF, organization_id: h }}
"#
        );
        assert!(Config::from_yaml(&yaml).is_err());

        // The same email may hold one login per organization type.
        let yaml = format!(
            r#"
identities:
  - {{ id: "1", email: pat@pets.com, password_hash: "{HASH}", role: HOSPITAL_VET, organization_id: h }}
  - {{ id: "2", email: pat@pets.com, password_hash: "{HASH}", role: BUSINESS_STAFF, organization_id: b }}
"#
        );
        assert!(Config::from_yaml(&yaml).is_ok());
    }

    #[test]
    fn test_identity_values_must_fit_in_headers() {
        let yaml = format!(
            "identities:\n  - {{ id: \"1\", email: a@hospital.com, password_hash: \"{HASH}\", role: HOSPITAL_STAFF, organization_id: \"hosp\\n001\" }}\n"
        );
        assert!(Config::from_yaml(&yaml).is_err());

        let yaml = format!(
            "identities:\n  - {{ id: \"\", email: a@hospital.com, password_hash: \"{HASH}\", role: HOSPITAL_STAFF, organization_id: h }}\n"
        );
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    fn test_plaintext_password_rejected() {
        let yaml = r#"
identities:
  - { id: "1", email: a@hospital.com, password_hash: "admin123", role: HOSPITAL_ADMIN, organization_id: h }
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let yaml = format!(
            r#"
identities:
  - {{ id: "1", email: a@hospital.com, password_hash: "{HASH}", role: HOSPITAL_JANITOR, organization_id: h }}
"#
        );
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = Config::default();
        let mut other = Config::default();
        other.server.port = 4000;
        other.guard.landing_path = "/dashboard/home".to_string();

        let merged = base.merge(other);
        assert_eq!(merged.server.port, 4000);
        assert_eq!(merged.guard.landing_path, "/dashboard/home");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.auth.jwt_secret, config.auth.jwt_secret);
    }
}
