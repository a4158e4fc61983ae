//! Route guard configuration

use serde::{Deserialize, Serialize};

/// Route guard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Paths under this prefix need a session
    #[serde(default = "default_protected_prefix")]
    pub protected_prefix: String,
    /// Login page
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Default destination after login
    #[serde(default = "default_landing_path")]
    pub landing_path: String,
    /// Query parameter carrying the originally requested path
    #[serde(default = "default_callback_param")]
    pub callback_param: String,
    /// Paths the guard never inspects
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_prefix: default_protected_prefix(),
            login_path: default_login_path(),
            landing_path: default_landing_path(),
            callback_param: default_callback_param(),
            excluded_prefixes: default_excluded_prefixes(),
        }
    }
}

impl GuardConfig {
    /// Merge guard configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.protected_prefix != default_protected_prefix() {
            self.protected_prefix = other.protected_prefix;
        }
        if other.login_path != default_login_path() {
            self.login_path = other.login_path;
        }
        if other.landing_path != default_landing_path() {
            self.landing_path = other.landing_path;
        }
        if other.callback_param != default_callback_param() {
            self.callback_param = other.callback_param;
        }
        if other.excluded_prefixes != default_excluded_prefixes() {
            self.excluded_prefixes = other.excluded_prefixes;
        }
        self
    }

    /// Validate guard configuration
    pub fn validate(&self) -> Result<(), String> {
        for (name, path) in [
            ("protected_prefix", &self.protected_prefix),
            ("login_path", &self.login_path),
            ("landing_path", &self.landing_path),
        ] {
            if !path.starts_with('/') {
                return Err(format!("{} must be an absolute path: {}", name, path));
            }
        }

        if self.callback_param.is_empty() {
            return Err("callback_param cannot be empty".to_string());
        }

        // A login page behind the guard would redirect to itself forever.
        let login = self.login_path.trim_end_matches('/');
        let protected = self.protected_prefix.trim_end_matches('/');
        if protected.is_empty() || login == protected || login.starts_with(&format!("{}/", protected)) {
            return Err("login_path cannot be under protected_prefix".to_string());
        }

        Ok(())
    }
}

fn default_protected_prefix() -> String {
    "/dashboard".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_landing_path() -> String {
    "/dashboard".to_string()
}

fn default_callback_param() -> String {
    "callbackUrl".to_string()
}

fn default_excluded_prefixes() -> Vec<String> {
    ["/api/auth", "/_next/static", "/_next/image", "/favicon.ico", "/public"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
