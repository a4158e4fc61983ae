//! Authentication endpoints

use crate::auth::cookie::{clear_session_cookie, read_session_token, session_cookie};
use crate::auth::csrf::{ensure_csrf_token, verify_csrf};
use crate::auth::rbac::{OrganizationType, Permission, PermissionSet, UserRole};
use crate::auth::{LoginCredentials, Session, has_permission};
use crate::server::middleware::resolve_session;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::cookie::Cookie;
use actix_web::http::header::{ACCEPT, LOCATION};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result as ActixResult, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configure authentication routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/csrf", web::get().to(csrf_token))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/session", web::get().to(get_session))
            .route("/session/update", web::post().to(update_session))
            .route("/permissions/{permission}", web::get().to(check_permission))
            .route("/permissions", web::get().to(list_permissions))
            .route("/roles", web::get().to(list_roles)),
    );
}

/// Client-facing view of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: UserView,
    pub permissions: PermissionSet,
    pub expires: DateTime<Utc>,
    pub refreshed_at: DateTime<Utc>,
}

/// User part of [`SessionView`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub organization_id: String,
    pub organization_type: OrganizationType,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            user: UserView {
                id: session.user_id.clone(),
                email: session.email.clone(),
                name: session.name.clone(),
                role: session.role,
                organization_id: session.organization_id.clone(),
                organization_type: session.organization_type,
            },
            permissions: session.permissions.clone(),
            expires: session.expires_at,
            refreshed_at: session.refreshed_at,
        }
    }
}

/// Login result for JSON clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginView {
    pub redirect: String,
    pub session: SessionView,
}

/// CSRF token for the login and logout forms
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfView {
    pub csrf_token: String,
}

/// Logout form body; the token may come as a header instead
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutForm {
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Result of a permission check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionView {
    pub permission: Permission,
    pub granted: bool,
}

fn wants_json(req: &HttpRequest) -> bool {
    req.headers()
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

fn with_cookie(mut response: HttpResponse, cookie: Option<&Cookie<'static>>) -> ActixResult<HttpResponse> {
    if let Some(cookie) = cookie {
        response.add_cookie(cookie)?;
    }
    Ok(response)
}

/// Hand out the CSRF token, setting its cookie when the client has none
pub async fn csrf_token(req: HttpRequest, state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let (token, cookie) =
        ensure_csrf_token(&req, &state.config.auth.cookie, state.cookie_secure());
    let response = HttpResponse::Ok().json(ApiResponse::success(CsrfView { csrf_token: token }));
    with_cookie(response, cookie.as_ref())
}

/// Log in with email, password and organization type (JSON or form body)
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Either<web::Json<LoginCredentials>, web::Form<LoginCredentials>>,
) -> Result<HttpResponse, GatewayError> {
    let credentials = match body {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    };
    verify_csrf(
        &req,
        credentials.csrf_token.as_deref(),
        &state.config.auth.cookie,
    )?;

    let now = Utc::now();
    let (session, token) = state.auth.issue_session_at(&credentials, now).await?;

    let cookie = session_cookie(
        token,
        &session,
        &state.config.auth.cookie,
        state.cookie_secure(),
        now,
    );
    let destination = state
        .guard
        .post_login_destination(credentials.callback_url.as_deref());
    debug!("Login complete, redirecting to {}", destination);

    if wants_json(&req) {
        Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::success(LoginView {
            redirect: destination,
            session: SessionView::from(&session),
        })))
    } else {
        Ok(HttpResponse::SeeOther()
            .cookie(cookie)
            .insert_header((LOCATION, destination))
            .finish())
    }
}

/// Log out and clear the session cookie
pub async fn logout(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: Option<web::Form<LogoutForm>>,
) -> Result<HttpResponse, GatewayError> {
    let cookie_config = &state.config.auth.cookie;
    let form = form.map(web::Form::into_inner).unwrap_or_default();
    verify_csrf(&req, form.csrf_token.as_deref(), cookie_config)?;

    if let Some(session) = read_session_token(&req, cookie_config)
        .and_then(|token| state.auth.authenticate_token(&token))
    {
        state.auth.logout(&session);
    }

    let cookie = clear_session_cookie(cookie_config, state.cookie_secure());
    let login_path = state.guard.config().login_path.clone();

    if wants_json(&req) {
        Ok(HttpResponse::Ok()
            .cookie(cookie)
            .json(ApiResponse::success(serde_json::json!({ "redirect": login_path }))))
    } else {
        Ok(HttpResponse::SeeOther()
            .cookie(cookie)
            .insert_header((LOCATION, login_path))
            .finish())
    }
}

/// Current session, refreshed if its window has elapsed
pub async fn get_session(req: HttpRequest, state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let resolved = resolve_session(&state, &req, Utc::now()).await;

    let response = match &resolved.session {
        Some(session) => HttpResponse::Ok().json(ApiResponse::success(SessionView::from(session))),
        None => GatewayError::unauthorized("No active session").error_response(),
    };
    with_cookie(response, resolved.cookie.as_ref())
}

/// Re-resolve the session's permissions immediately
pub async fn update_session(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let now = Utc::now();
    let cookie_config = &state.config.auth.cookie;
    let secure = state.cookie_secure();

    let Some(session) = read_session_token(&req, cookie_config)
        .and_then(|token| state.auth.authenticate_token_at(&token, now))
    else {
        return Ok(GatewayError::unauthorized("No active session").error_response());
    };

    match state.auth.update_session_at(&session, now).await {
        Ok((updated, token)) => {
            let cookie = session_cookie(token, &updated, cookie_config, secure, now);
            Ok(HttpResponse::Ok()
                .cookie(cookie)
                .json(ApiResponse::success(SessionView::from(&updated))))
        }
        Err(e) => {
            let cookie = clear_session_cookie(cookie_config, secure);
            with_cookie(e.error_response(), Some(&cookie))
        }
    }
}

/// Whether the current session holds a permission
pub async fn check_permission(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let permission = path
        .parse::<Permission>()
        .map_err(|e| GatewayError::bad_request(e.to_string()))?;

    let resolved = resolve_session(&state, &req, Utc::now()).await;
    let granted = has_permission(resolved.session.as_ref(), permission);

    let response = HttpResponse::Ok().json(ApiResponse::success(PermissionView {
        permission,
        granted,
    }));
    with_cookie(response, resolved.cookie.as_ref())
}

/// Query for [`list_roles`]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolesQuery {
    pub organization_type: Option<String>,
}

/// Role catalog with each role's permissions, optionally for one
/// organization type
pub async fn list_roles(
    state: web::Data<AppState>,
    query: web::Query<RolesQuery>,
) -> Result<HttpResponse, GatewayError> {
    let rbac = state.auth.rbac();

    let roles = match query.organization_type.as_deref() {
        None => rbac.list_roles(),
        Some(raw) => {
            let organization_type = raw
                .parse::<OrganizationType>()
                .map_err(|_| GatewayError::bad_request(format!("Unknown organization type: {}", raw)))?;
            rbac.roles_for_organization(organization_type)
                .into_iter()
                .filter_map(|role| rbac.get_role(role))
                .collect()
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(roles)))
}

/// The full permission catalog
pub async fn list_permissions(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(state.auth.rbac().list_permissions()))
}
