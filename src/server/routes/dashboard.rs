//! Login page and protected dashboard

use crate::auth::IdentityContext;
use crate::auth::csrf::ensure_csrf_token;
use crate::auth::rbac::UserRole;
use crate::server::middleware::{ORG_ID_HEADER, USER_ID_HEADER, USER_ROLE_HEADER, current_session};
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};

/// Configure page routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::get().to(login_page))
        .route("/dashboard", web::get().to(dashboard))
        .route("/dashboard/{tail:.*}", web::get().to(dashboard));
}

/// What a dashboard page learns about its caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub path: String,
    pub identity: IdentityContext,
    pub permissions: Vec<String>,
}

/// Login screen placeholder; issues the CSRF token the form must echo
pub async fn login_page(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let guard = state.guard.config();
    let (csrf_token, cookie) =
        ensure_csrf_token(&req, &state.config.auth.cookie, state.cookie_secure());

    let mut response = HttpResponse::Ok();
    response.content_type("text/plain; charset=utf-8");
    if let Some(cookie) = cookie {
        response.cookie(cookie);
    }
    response.body(format!(
        "Sign in\n\nPOST /api/auth/login with email, password, organizationType \
         (HOSPITAL or BUSINESS), csrfToken and an optional {}.\n\ncsrfToken: {}\n",
        guard.callback_param, csrf_token
    ))
}

/// Protected landing page
pub async fn dashboard(req: HttpRequest) -> Result<HttpResponse, GatewayError> {
    let session = current_session(&req)
        .ok_or_else(|| GatewayError::unauthorized("Authentication required"))?;
    let identity = identity_from_headers(&req)
        .ok_or_else(|| GatewayError::internal("Identity headers missing"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(DashboardView {
        path: req.path().to_string(),
        identity,
        permissions: session.permissions.to_strings(),
    })))
}

/// Identity context as forwarded by the session guard
pub fn identity_from_headers(req: &HttpRequest) -> Option<IdentityContext> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    Some(IdentityContext {
        user_id: header(USER_ID_HEADER)?,
        role: header(USER_ROLE_HEADER)?.parse::<UserRole>().ok()?,
        organization_id: header(ORG_ID_HEADER)?,
    })
}
