//! Session cookie transport

use crate::auth::jwt::extract_bearer;
use crate::auth::session::Session;
use crate::config::CookieConfig;
use actix_web::HttpMessage;
use actix_web::cookie::{Cookie, time::Duration as CookieDuration};
use actix_web::http::header::{AUTHORIZATION, COOKIE};
use chrono::{DateTime, Utc};

/// Cookie carrying a freshly signed session token
pub fn session_cookie(
    token: String,
    session: &Session,
    config: &CookieConfig,
    secure: bool,
    now: DateTime<Utc>,
) -> Cookie<'static> {
    Cookie::build(config.name.clone(), token)
        .path(config.path.clone())
        .http_only(true)
        .same_site(config.same_site.into())
        .secure(secure)
        .max_age(CookieDuration::seconds(session.remaining_seconds(now)))
        .finish()
}

/// Cookie that removes the session cookie from the client
pub fn clear_session_cookie(config: &CookieConfig, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(config.name.clone(), "")
        .path(config.path.clone())
        .http_only(true)
        .same_site(config.same_site.into())
        .secure(secure)
        .finish();
    cookie.make_removal();
    cookie
}

/// Session token from the cookie, or from a bearer header for API clients
pub fn read_session_token(request: &impl HttpMessage, config: &CookieConfig) -> Option<String> {
    if let Some(token) = request_cookie(request, &config.name) {
        return Some(token);
    }

    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer)
        .map(str::to_string)
}

/// Non-empty value of the request cookie called `name`
pub(crate) fn request_cookie(request: &impl HttpMessage, name: &str) -> Option<String> {
    request
        .headers()
        .get_all(COOKIE)
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| Cookie::parse(pair.trim()).ok())
        .find(|cookie| cookie.name() == name && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}
