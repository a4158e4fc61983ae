//! Custom test assertions

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;

/// Assert the response redirects to `location` with `status`
pub fn assert_redirect<B>(resp: &ServiceResponse<B>, status: StatusCode, location: &str) {
    assert_eq!(resp.status(), status, "unexpected status");
    let actual = resp
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert_eq!(actual, location, "unexpected Location header");
}

/// Cookie named `name` set by the response, if any
pub fn response_cookie<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.into_owned())
}

/// Assert the response removes the cookie named `name`
pub fn assert_cookie_cleared<B>(resp: &ServiceResponse<B>, name: &str) {
    let cookie = response_cookie(resp, name).expect("Expected a cookie removal");
    assert_eq!(cookie.value(), "", "Expected an empty cookie value");
}
