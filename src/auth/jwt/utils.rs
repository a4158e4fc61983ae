//! JWT utility functions

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn extract_bearer(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
