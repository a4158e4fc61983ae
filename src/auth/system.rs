//! Core authentication system implementation

use crate::auth::credentials::LoginCredentials;
use crate::auth::jwt::TokenCodec;
use crate::auth::password::{UNMATCHABLE_PASSWORD_HASH, verify_password};
use crate::auth::rbac::RbacSystem;
use crate::auth::session::{Session, SessionPolicy, SessionState};
use crate::auth::store::IdentityStore;
use crate::config::AuthConfig;
use crate::utils::error::{GatewayError, Result};
use crate::utils::logging::{AuthEvent, SecurityLogger};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Main authentication system
#[derive(Clone)]
pub struct AuthSystem {
    /// Authentication configuration
    pub(super) config: Arc<AuthConfig>,
    /// Identity lookups for login and refresh
    pub(super) store: Arc<dyn IdentityStore>,
    /// Session token codec
    pub(super) codec: Arc<TokenCodec>,
    /// RBAC system
    pub(super) rbac: Arc<RbacSystem>,
    /// Session lifetime policy
    pub(super) policy: SessionPolicy,
}

impl AuthSystem {
    /// Create a new authentication system
    pub fn new(config: &AuthConfig, store: Arc<dyn IdentityStore>) -> Result<Self> {
        info!("Initializing authentication system");

        let config = Arc::new(config.clone());
        let codec = Arc::new(TokenCodec::new(&config)?);
        let rbac = Arc::new(RbacSystem::new());
        let policy = config.session_policy();

        info!(
            "Authentication system initialized (session lifetime {}s, refresh every {}s)",
            policy.max_age.num_seconds(),
            policy.update_age.num_seconds()
        );

        Ok(Self {
            config,
            store,
            codec,
            rbac,
            policy,
        })
    }

    /// Log a user in and issue a signed session
    ///
    /// Every failure is reported as [`GatewayError::InvalidCredentials`].
    pub async fn issue_session(&self, credentials: &LoginCredentials) -> Result<(Session, String)> {
        self.issue_session_at(credentials, Utc::now()).await
    }

    /// [`AuthSystem::issue_session`] against an explicit clock
    pub async fn issue_session_at(
        &self,
        credentials: &LoginCredentials,
        now: DateTime<Utc>,
    ) -> Result<(Session, String)> {
        let state = SessionState::Unauthenticated.transition(SessionState::Authenticating)?;

        let issued = self
            .authenticate_credentials(credentials, now)
            .await
            .and_then(|session| {
                let token = self.codec.serialize_session(&session)?;
                Ok((session, token))
            });

        match issued {
            Ok((session, token)) => {
                state.transition(SessionState::Authenticated)?;
                SecurityLogger::log_auth_event(
                    AuthEvent::Login,
                    true,
                    Some(&session.user_id),
                    Some(session.session_id),
                );
                Ok((session, token))
            }
            Err(e) => {
                debug!("Login rejected: {}", e);
                state.transition(SessionState::Unauthenticated)?;
                SecurityLogger::log_auth_event(AuthEvent::Login, false, None, None);
                Err(GatewayError::InvalidCredentials)
            }
        }
    }

    /// Validate, look up and verify; the error detail never leaves this module
    async fn authenticate_credentials(
        &self,
        credentials: &LoginCredentials,
        now: DateTime<Utc>,
    ) -> Result<Session> {
        let validated = credentials
            .validate()
            .map_err(|e| GatewayError::validation(e.to_string()))?;

        let identity = self
            .store
            .find_by_email(&validated.email, validated.organization_type)
            .await?
            .filter(|identity| identity.matches_login(&validated.email, validated.organization_type));

        // Unknown accounts still pay for one Argon2 verification.
        let hash = identity
            .as_ref()
            .map_or(UNMATCHABLE_PASSWORD_HASH, |identity| identity.password_hash.as_str());
        let verified = verify_password(&validated.password, hash)?;

        match identity {
            None => Err(GatewayError::unauthorized(format!(
                "no active {} identity for {}",
                validated.organization_type, validated.email
            ))),
            Some(identity) if !verified => Err(GatewayError::unauthorized(format!(
                "password mismatch for identity {}",
                identity.id
            ))),
            Some(identity) => Ok(Session::issue(&identity, &self.policy, now)),
        }
    }

    /// Re-resolve permissions once the refresh window has elapsed
    ///
    /// A session still inside its window is returned as is with a re-signed
    /// token. Expired sessions fail with [`GatewayError::SessionExpired`].
    pub async fn refresh_session(&self, session: &Session) -> Result<(Session, String)> {
        self.refresh_session_at(session, Utc::now()).await
    }

    /// [`AuthSystem::refresh_session`] against an explicit clock
    pub async fn refresh_session_at(
        &self,
        session: &Session,
        now: DateTime<Utc>,
    ) -> Result<(Session, String)> {
        match session.state_at(&self.policy, now) {
            SessionState::Expired => {
                SecurityLogger::log_auth_event(
                    AuthEvent::Expired,
                    false,
                    Some(&session.user_id),
                    Some(session.session_id),
                );
                Err(GatewayError::SessionExpired)
            }
            SessionState::Refreshing => self.reresolve(session, now, AuthEvent::Refresh).await,
            _ => {
                let token = self.codec.serialize_session(session)?;
                Ok((session.clone(), token))
            }
        }
    }

    /// Re-resolve permissions now, regardless of the refresh window
    pub async fn update_session(&self, session: &Session) -> Result<(Session, String)> {
        self.update_session_at(session, Utc::now()).await
    }

    /// [`AuthSystem::update_session`] against an explicit clock
    pub async fn update_session_at(
        &self,
        session: &Session,
        now: DateTime<Utc>,
    ) -> Result<(Session, String)> {
        if session.is_expired(now) {
            return Err(GatewayError::SessionExpired);
        }
        self.reresolve(session, now, AuthEvent::Update).await
    }

    async fn reresolve(
        &self,
        session: &Session,
        now: DateTime<Utc>,
        event: AuthEvent,
    ) -> Result<(Session, String)> {
        let state = SessionState::Authenticated.transition(SessionState::Refreshing)?;

        let identity = match self.store.find_by_id(&session.user_id).await {
            Ok(Some(identity))
                if identity.is_active
                    && identity.organization_id == session.organization_id
                    && identity.organization_type() == session.organization_type =>
            {
                identity
            }
            Ok(_) => {
                debug!(
                    "Identity behind session {} is gone or no longer eligible",
                    session.session_id
                );
                return self.expire(state, session);
            }
            Err(e) => {
                warn!("Identity lookup failed during {}: {}", event.as_str(), e);
                return self.expire(state, session);
            }
        };

        let refreshed = session.refreshed(identity.role, now)?;
        let token = self.codec.serialize_session(&refreshed)?;
        state.transition(SessionState::Authenticated)?;

        if refreshed.role != session.role {
            info!(
                "Session {} role changed from {} to {}",
                session.session_id, session.role, refreshed.role
            );
        }
        SecurityLogger::log_auth_event(
            event,
            true,
            Some(&refreshed.user_id),
            Some(refreshed.session_id),
        );
        Ok((refreshed, token))
    }

    fn expire(&self, state: SessionState, session: &Session) -> Result<(Session, String)> {
        state.transition(SessionState::Expired)?;
        SecurityLogger::log_auth_event(
            AuthEvent::Expired,
            false,
            Some(&session.user_id),
            Some(session.session_id),
        );
        Err(GatewayError::SessionExpired)
    }

    /// Decode a session token; invalid or expired tokens count as no session
    pub fn authenticate_token(&self, token: &str) -> Option<Session> {
        self.authenticate_token_at(token, Utc::now())
    }

    /// [`AuthSystem::authenticate_token`] against an explicit clock
    pub fn authenticate_token_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        match self.codec.decode_session(token, now) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("Ignoring session token: {}", e);
                None
            }
        }
    }

    /// End a session
    ///
    /// Tokens are self-contained, so the client drops the cookie.
    pub fn logout(&self, session: &Session) {
        SecurityLogger::log_auth_event(
            AuthEvent::Logout,
            true,
            Some(&session.user_id),
            Some(session.session_id),
        );
    }

    /// Get authentication configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Get session lifetime policy
    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Get token codec
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Get RBAC system
    pub fn rbac(&self) -> &RbacSystem {
        &self.rbac
    }
}
