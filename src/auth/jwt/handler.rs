//! Core token codec implementation

use super::types::{SessionClaims, TokenCodec};
use crate::auth::session::Session;
use crate::config::AuthConfig;
use crate::utils::error::{GatewayError, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{debug, warn};

impl TokenCodec {
    /// Create a new codec from the auth configuration
    pub fn new(config: &AuthConfig) -> Result<Self> {
        if config.jwt_secret.is_empty() {
            return Err(GatewayError::config("JWT secret is required"));
        }
        let secret = config.jwt_secret.as_bytes();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        })
    }

    /// Sign a session into a token
    pub fn serialize_session(&self, session: &Session) -> Result<String> {
        let claims = SessionClaims {
            sub: session.user_id.clone(),
            email: session.email.clone(),
            name: session.name.clone(),
            role: session.role,
            org_id: session.organization_id.clone(),
            org_type: session.organization_type,
            permissions: session.permissions.clone(),
            sid: session.session_id,
            iat: session.issued_at.timestamp(),
            rat: session.refreshed_at.timestamp(),
            exp: session.expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let header = Header::new(self.algorithm);
        let token = encode(&header, &claims, &self.encoding_key)?;

        debug!("Created session token for user: {}", session.user_id);
        Ok(token)
    }

    /// Verify a token's signature, issuer and audience and decode its claims
    ///
    /// Expiry is not checked here; see [`TokenCodec::decode_session`].
    pub fn verify_token(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                warn!("JWT verification failed: {}", e);
                GatewayError::Jwt(e)
            })?;

        Ok(token_data.claims)
    }

    /// Decode a token into a live session as of `now`
    pub fn decode_session(&self, token: &str, now: DateTime<Utc>) -> Result<Session> {
        let claims = self.verify_token(token)?;

        if claims.org_type != claims.role.organization_type() {
            warn!("Session token {} has inconsistent organization type", claims.sid);
            return Err(GatewayError::unauthorized("Inconsistent session token"));
        }

        if now.timestamp() >= claims.exp {
            debug!("Session token {} expired", claims.sid);
            return Err(GatewayError::SessionExpired);
        }

        let session = Session {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
            organization_id: claims.org_id,
            organization_type: claims.org_type,
            permissions: claims.permissions,
            session_id: claims.sid,
            issued_at: timestamp(claims.iat)?,
            refreshed_at: timestamp(claims.rat)?,
            expires_at: timestamp(claims.exp)?,
        };

        debug!("Token verified for user: {}", session.user_id);
        Ok(session)
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| GatewayError::unauthorized("Session token timestamp out of range"))
}
