//! Double-submit CSRF protection for the login and logout forms
//!
//! `GET /login` and `GET /api/auth/csrf` hand out a random token in an
//! HttpOnly cookie and in the response body. State-changing auth posts must
//! echo it back in the `x-csrf-token` header or the `csrfToken` field.

use crate::auth::cookie::request_cookie;
use crate::config::CookieConfig;
use crate::utils::error::{GatewayError, Result};
use actix_web::HttpMessage;
use actix_web::cookie::Cookie;
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use tracing::debug;

/// Header carrying the CSRF token for non-form clients
pub const CSRF_HEADER: &str = "x-csrf-token";

const CSRF_TOKEN_LENGTH: usize = 43;

/// Fresh random CSRF token
pub fn generate_csrf_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CSRF_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// CSRF token already held by the client, if any
pub fn read_csrf_cookie(request: &impl HttpMessage, config: &CookieConfig) -> Option<String> {
    request_cookie(request, &config.csrf_name)
}

/// The client's CSRF token, or a new one and the cookie that carries it
pub fn ensure_csrf_token(
    request: &impl HttpMessage,
    config: &CookieConfig,
    secure: bool,
) -> (String, Option<Cookie<'static>>) {
    match read_csrf_cookie(request, config) {
        Some(token) => (token, None),
        None => {
            let token = generate_csrf_token();
            let cookie = csrf_cookie(token.clone(), config, secure);
            (token, Some(cookie))
        }
    }
}

/// Session-scoped cookie holding the CSRF token
pub fn csrf_cookie(token: String, config: &CookieConfig, secure: bool) -> Cookie<'static> {
    Cookie::build(config.csrf_name.clone(), token)
        .path(config.path.clone())
        .http_only(true)
        .same_site(config.same_site.into())
        .secure(secure)
        .finish()
}

/// Check the submitted token against the CSRF cookie
///
/// The header wins over the form field when both are present.
pub fn verify_csrf(
    request: &impl HttpMessage,
    field: Option<&str>,
    config: &CookieConfig,
) -> Result<()> {
    let header = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok());

    let Some(submitted) = header.or(field).filter(|token| !token.is_empty()) else {
        debug!("CSRF token missing from request");
        return Err(GatewayError::CsrfMismatch);
    };
    let Some(expected) = read_csrf_cookie(request, config) else {
        debug!("CSRF cookie missing from request");
        return Err(GatewayError::CsrfMismatch);
    };

    if constant_time_eq(submitted, &expected) {
        Ok(())
    } else {
        debug!("CSRF token does not match its cookie");
        Err(GatewayError::CsrfMismatch)
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.bytes().zip(b.bytes()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn with_cookie(token: &str) -> TestRequest {
        TestRequest::default().cookie(Cookie::new(CookieConfig::default().csrf_name, token.to_string()))
    }

    #[test]
    fn test_generated_tokens_are_random() {
        let token = generate_csrf_token();
        assert_eq!(token.len(), CSRF_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_csrf_token());
    }

    #[test]
    fn test_matching_field_or_header_passes() {
        let config = CookieConfig::default();

        let request = with_cookie("abc123").to_http_request();
        assert!(verify_csrf(&request, Some("abc123"), &config).is_ok());

        let request = with_cookie("abc123")
            .insert_header((CSRF_HEADER, "abc123"))
            .to_http_request();
        assert!(verify_csrf(&request, None, &config).is_ok());
    }

    #[test]
    fn test_missing_or_mismatched_token_rejected() {
        let config = CookieConfig::default();

        let request = with_cookie("abc123").to_http_request();
        assert!(matches!(
            verify_csrf(&request, None, &config),
            Err(GatewayError::CsrfMismatch)
        ));
        assert!(verify_csrf(&request, Some("abc124"), &config).is_err());
        assert!(verify_csrf(&request, Some(""), &config).is_err());

        // A token with no cookie to match proves nothing.
        let request = TestRequest::default().to_http_request();
        assert!(verify_csrf(&request, Some("abc123"), &config).is_err());
    }

    #[test]
    fn test_ensure_reuses_existing_token() {
        let config = CookieConfig::default();

        let request = with_cookie("kept").to_http_request();
        let (token, cookie) = ensure_csrf_token(&request, &config, false);
        assert_eq!(token, "kept");
        assert!(cookie.is_none());

        let request = TestRequest::default().to_http_request();
        let (token, cookie) = ensure_csrf_token(&request, &config, true);
        let cookie = cookie.unwrap();
        assert_eq!(cookie.value(), token);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.name(), config.csrf_name);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("token", "token"));
        assert!(!constant_time_eq("token", "tokem"));
        assert!(!constant_time_eq("token", "token2"));
    }
}
