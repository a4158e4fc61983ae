//! Route guard
//!
//! Decides, once per request, whether a path may be served given the current
//! session. The guard is stateless; it never touches the identity store.

use crate::auth::session::{IdentityContext, Session};
use crate::config::GuardConfig;
use tracing::debug;

/// Outcome of evaluating one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Send the client elsewhere
    Redirect { location: String },
    /// Serve the request, optionally annotated with the caller's identity
    PassThrough { identity: Option<IdentityContext> },
}

/// Path-based authentication guard
#[derive(Debug, Clone)]
pub struct RouteGuard {
    config: GuardConfig,
}

impl RouteGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Evaluate a request path against the current session
    pub fn evaluate(&self, path: &str, session: Option<&Session>) -> GuardDecision {
        if self.is_excluded(path) {
            return GuardDecision::PassThrough { identity: None };
        }

        match session {
            None if self.is_protected(path) => {
                debug!("Unauthenticated request to {} redirected to login", path);
                GuardDecision::Redirect {
                    location: self.login_redirect(path),
                }
            }
            Some(_) if under_prefix(path, &self.config.login_path) => {
                debug!("Authenticated request to login redirected to landing");
                GuardDecision::Redirect {
                    location: self.config.landing_path.clone(),
                }
            }
            _ => GuardDecision::PassThrough {
                identity: session.map(Session::identity_context),
            },
        }
    }

    /// Whether `path` requires a session
    pub fn is_protected(&self, path: &str) -> bool {
        under_prefix(path, &self.config.protected_prefix)
    }

    /// Whether `path` bypasses the guard entirely
    pub fn is_excluded(&self, path: &str) -> bool {
        self.config
            .excluded_prefixes
            .iter()
            .any(|prefix| under_prefix(path, prefix))
    }

    /// Login URL carrying `path` as the callback parameter
    pub fn login_redirect(&self, path: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
        // `/` is legal in a query component; keep callbacks readable.
        format!(
            "{}?{}={}",
            self.config.login_path,
            self.config.callback_param,
            encoded.replace("%2F", "/")
        )
    }

    /// Post-login destination: a same-origin path, never the login page itself
    pub fn post_login_destination(&self, callback: Option<&str>) -> String {
        match callback {
            Some(path)
                if path.starts_with('/')
                    && !path.starts_with("//")
                    && !path.contains('\\')
                    && !under_prefix(path, &self.config.login_path) =>
            {
                path.to_string()
            }
            _ => self.config.landing_path.clone(),
        }
    }
}

/// `path` equals `prefix` or lies beneath it on a segment boundary
fn under_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}
