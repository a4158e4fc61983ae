//! JWT types and data structures

use crate::auth::rbac::{OrganizationType, PermissionSet, UserRole};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct TokenCodec {
    /// Encoding key for signing tokens
    pub(super) encoding_key: EncodingKey,
    /// Decoding key for verifying tokens
    pub(super) decoding_key: DecodingKey,
    /// JWT algorithm
    pub(super) algorithm: Algorithm,
    /// Token issuer
    pub(super) issuer: String,
    /// Token audience
    pub(super) audience: String,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Login email
    pub email: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// User role
    pub role: UserRole,
    /// Organization ID
    pub org_id: String,
    /// Organization type
    pub org_type: OrganizationType,
    /// Permission snapshot
    pub permissions: PermissionSet,
    /// Session ID
    pub sid: Uuid,
    /// Issued at timestamp
    pub iat: i64,
    /// Last permission refresh timestamp
    pub rat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}
