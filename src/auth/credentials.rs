//! Login submission validation
//!
//! Shape checks run before any identity lookup. Callers only ever learn that
//! the credentials were invalid; the specific reason stays in debug logs.

use crate::auth::rbac::OrganizationType;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("Invalid email regex")
});

/// Raw login form as submitted
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
    pub organization_type: String,
    /// Where to send the user after login
    #[serde(default)]
    pub callback_url: Option<String>,
    /// Double-submit CSRF token, when not sent as a header
    #[serde(default)]
    pub csrf_token: Option<String>,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("organization_type", &self.organization_type)
            .field("callback_url", &self.callback_url)
            .finish_non_exhaustive()
    }
}

/// Credentials that passed the shape checks
#[derive(Clone)]
pub struct ValidatedCredentials {
    pub email: String,
    pub password: String,
    pub organization_type: OrganizationType,
}

/// Why credentials were rejected; never shown to the client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("malformed email")]
    MalformedEmail,
    #[error("password shorter than {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,
    #[error("organization type not selectable at login")]
    UnsupportedOrganizationType,
}

impl LoginCredentials {
    /// Run the shape checks
    pub fn validate(&self) -> Result<ValidatedCredentials, CredentialError> {
        let email = self.email.trim();
        if email.len() > 254 || !EMAIL_PATTERN.is_match(email) {
            return Err(CredentialError::MalformedEmail);
        }

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CredentialError::PasswordTooShort);
        }

        let organization_type = self
            .organization_type
            .parse::<OrganizationType>()
            .ok()
            .filter(OrganizationType::is_login_selectable)
            .ok_or(CredentialError::UnsupportedOrganizationType)?;

        Ok(ValidatedCredentials {
            email: email.to_string(),
            password: self.password.clone(),
            organization_type,
        })
    }
}
