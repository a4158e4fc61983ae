//! Session guard middleware
//!
//! Runs once per request: resolves the session cookie, refreshes it when the
//! refresh window has elapsed, then applies the route guard. Passing requests
//! carry the caller's identity as headers and the [`Session`] in request
//! extensions.

use super::{ORG_ID_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};
use crate::auth::cookie::{clear_session_cookie, read_session_token, session_cookie};
use crate::auth::{GuardDecision, IdentityContext, Session};
use crate::server::state::AppState;
use actix_web::body::EitherBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue, LOCATION};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use chrono::{DateTime, Utc};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::{debug, warn};

/// Session resolved for one request
#[derive(Debug, Default)]
pub struct ResolvedSession {
    /// Live session, if any
    pub session: Option<Session>,
    /// Cookie to send back: a refreshed token or a removal
    pub cookie: Option<Cookie<'static>>,
}

/// Resolve the request's session as of `now`
///
/// Invalid or expired tokens resolve to no session and a cookie removal.
/// A session past its refresh window is refreshed; if that fails it is
/// treated as expired.
pub async fn resolve_session(
    state: &AppState,
    request: &impl HttpMessage,
    now: DateTime<Utc>,
) -> ResolvedSession {
    let cookie_config = &state.config.auth.cookie;
    let secure = state.cookie_secure();

    let Some(token) = read_session_token(request, cookie_config) else {
        return ResolvedSession::default();
    };

    let Some(session) = state.auth.authenticate_token_at(&token, now) else {
        return ResolvedSession {
            session: None,
            cookie: Some(clear_session_cookie(cookie_config, secure)),
        };
    };

    if !session.needs_refresh(state.auth.policy(), now) {
        return ResolvedSession {
            session: Some(session),
            cookie: None,
        };
    }

    match state.auth.refresh_session_at(&session, now).await {
        Ok((refreshed, token)) => {
            let cookie = session_cookie(token, &refreshed, cookie_config, secure, now);
            ResolvedSession {
                session: Some(refreshed),
                cookie: Some(cookie),
            }
        }
        Err(e) => {
            if e.is_auth_failure() {
                debug!("Session {} dropped on refresh: {}", session.session_id, e);
            } else {
                warn!("Session {} dropped, refresh failed: {}", session.session_id, e);
            }
            ResolvedSession {
                session: None,
                cookie: Some(clear_session_cookie(cookie_config, secure)),
            }
        }
    }
}

/// Session placed in request extensions by [`SessionGuardMiddleware`]
pub fn current_session(req: &HttpRequest) -> Option<Session> {
    req.extensions().get::<Session>().cloned()
}

/// Session guard middleware for Actix-web
pub struct SessionGuardMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionGuardMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = SessionGuardMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for the session guard
pub struct SessionGuardMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionGuardMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            // Identity headers are only ever set here.
            strip_identity_headers(req.headers_mut());

            let Some(state) = state else {
                warn!("Session guard running without application state");
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            };

            let path = req.path().to_string();
            let resolved = if state.guard.is_excluded(&path) {
                ResolvedSession::default()
            } else {
                resolve_session(&state, &req, Utc::now()).await
            };

            match state.guard.evaluate(&path, resolved.session.as_ref()) {
                GuardDecision::Redirect { location } => {
                    let mut response = HttpResponse::Found()
                        .insert_header((LOCATION, location))
                        .finish();
                    if let Some(cookie) = &resolved.cookie {
                        response.add_cookie(cookie)?;
                    }
                    Ok(req.into_response(response).map_into_right_body())
                }
                GuardDecision::PassThrough { identity } => {
                    if let Some(identity) = &identity {
                        insert_identity_headers(req.headers_mut(), identity);
                    }
                    if let Some(session) = resolved.session {
                        req.extensions_mut().insert(session);
                    }

                    let mut res = service.call(req).await?;
                    if let Some(cookie) = &resolved.cookie {
                        res.response_mut().add_cookie(cookie)?;
                    }
                    Ok(res.map_into_left_body())
                }
            }
        })
    }
}

fn strip_identity_headers(headers: &mut HeaderMap) {
    for name in [USER_ID_HEADER, USER_ROLE_HEADER, ORG_ID_HEADER] {
        headers.remove(name);
    }
}

fn insert_identity_headers(headers: &mut HeaderMap, identity: &IdentityContext) {
    let values = [
        (USER_ID_HEADER, HeaderValue::from_str(&identity.user_id)),
        (USER_ROLE_HEADER, HeaderValue::from_str(identity.role.as_str())),
        (ORG_ID_HEADER, HeaderValue::from_str(&identity.organization_id)),
    ];

    for (name, value) in values {
        match value {
            Ok(value) => {
                headers.insert(HeaderName::from_static(name), value);
            }
            Err(_) => warn!("Identity value for {} is not a valid header", name),
        }
    }
}
