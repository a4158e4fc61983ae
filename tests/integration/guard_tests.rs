//! Route guard behavior through the full middleware stack

#[cfg(test)]
mod tests {
    use crate::common::assertions::{assert_redirect, response_cookie};
    use crate::common::{IdentityFactory, TEST_CSRF_TOKEN, TestApp, with_csrf};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use pawgate::server::create_app;
    use serde_json::Value;

    // ==================== Unauthenticated ====================

    #[actix_web::test]
    async fn test_protected_paths_redirect_with_callback() {
        let test_app = TestApp::new(IdentityFactory::all());
        let app = test::init_service(create_app(test_app.state.clone())).await;

        for (path, location) in [
            ("/dashboard", "/login?callbackUrl=/dashboard"),
            ("/dashboard/patients", "/login?callbackUrl=/dashboard/patients"),
            (
                "/dashboard/finance/reports",
                "/login?callbackUrl=/dashboard/finance/reports",
            ),
        ] {
            let req = test::TestRequest::get().uri(path).to_request();
            let resp = test::call_service(&app, req).await;
            assert_redirect(&resp, StatusCode::FOUND, location);
        }
    }

    #[actix_web::test]
    async fn test_excluded_and_unprotected_paths_are_not_redirected() {
        let test_app = TestApp::new(IdentityFactory::all());
        let app = test::init_service(create_app(test_app.state.clone())).await;

        for path in [
            "/_next/static/chunk.js",
            "/favicon.ico",
            "/public/logo.png",
            "/dashboards",
            "/api/auth/session",
        ] {
            let req = test::TestRequest::get().uri(path).to_request();
            let resp = test::call_service(&app, req).await;
            assert_ne!(resp.status(), StatusCode::FOUND, "{path}");
        }
    }

    // ==================== Authenticated ====================

    #[actix_web::test]
    async fn test_authenticated_login_page_redirects_to_dashboard() {
        let test_app = TestApp::new(IdentityFactory::all());
        let cookie_name = test_app.cookie_name();
        let app = test::init_service(create_app(test_app.state.clone())).await;

        // Form clients echo the token in the csrfToken field.
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .cookie(Cookie::new(
                test_app.state.config.auth.cookie.csrf_name.clone(),
                TEST_CSRF_TOKEN,
            ))
            .set_form([
                ("email", "owner@business.com"),
                ("password", "owner123"),
                ("organizationType", "BUSINESS"),
                ("csrfToken", TEST_CSRF_TOKEN),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_redirect(&resp, StatusCode::SEE_OTHER, "/dashboard");
        let cookie = response_cookie(&resp, &cookie_name).unwrap();

        let req = test::TestRequest::get()
            .uri("/login")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_redirect(&resp, StatusCode::FOUND, "/dashboard");
    }

    #[actix_web::test]
    async fn test_dashboard_receives_guard_identity_not_client_headers() {
        let test_app = TestApp::new(IdentityFactory::all());
        let cookie_name = test_app.cookie_name();
        let app = test::init_service(create_app(test_app.state.clone())).await;

        let req = with_csrf(test::TestRequest::post().uri("/api/auth/login"))
            .set_form([
                ("email", "owner@business.com"),
                ("password", "owner123"),
                ("organizationType", "BUSINESS"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        let cookie = response_cookie(&resp, &cookie_name).unwrap();

        let req = test::TestRequest::get()
            .uri("/dashboard/bookings")
            .cookie(cookie)
            .insert_header(("x-user-id", "1"))
            .insert_header(("x-org-id", "hosp-001"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["identity"]["user_id"], "4");
        assert_eq!(body["data"]["identity"]["role"], "BUSINESS_OWNER");
        assert_eq!(body["data"]["identity"]["organization_id"], "biz-001");
    }

    #[actix_web::test]
    async fn test_tampered_cookie_is_treated_as_absent() {
        let test_app = TestApp::new(IdentityFactory::all());
        let cookie_name = test_app.cookie_name();
        let app = test::init_service(create_app(test_app.state.clone())).await;

        let req = with_csrf(test::TestRequest::post().uri("/api/auth/login"))
            .set_form([
                ("email", "staff@hospital.com"),
                ("password", "staff123"),
                ("organizationType", "HOSPITAL"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        let mut cookie = response_cookie(&resp, &cookie_name).unwrap();

        // Swap the first character of the signature.
        let token = cookie.value().to_string();
        let at = token.rfind('.').unwrap() + 1;
        let replacement = if token[at..].starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}{}{}", &token[..at], replacement, &token[at + 1..]);
        cookie.set_value(tampered);

        let req = test::TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_redirect(&resp, StatusCode::FOUND, "/login?callbackUrl=/dashboard");
    }
}
