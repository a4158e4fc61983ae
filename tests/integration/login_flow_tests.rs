//! Login, permission check and logout over HTTP

#[cfg(test)]
mod tests {
    use crate::common::assertions::{assert_cookie_cleared, assert_redirect, response_cookie};
    use crate::common::{IdentityFactory, TestApp, with_csrf};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use pawgate::config::Environment;
    use pawgate::server::create_app;
    use serde_json::{Value, json};

    fn json_login(email: &str, password: &str, org: &str) -> test::TestRequest {
        with_csrf(test::TestRequest::post().uri("/api/auth/login"))
            .insert_header(("accept", "application/json"))
            .set_json(json!({
                "email": email,
                "password": password,
                "organizationType": org,
            }))
    }

    // ==================== Login ====================

    #[actix_web::test]
    async fn test_vet_session_grants_diagnosis_but_not_staff_delete() {
        let test_app = TestApp::new(IdentityFactory::all());
        let cookie_name = test_app.cookie_name();
        let app = test::init_service(create_app(test_app.state.clone())).await;

        let resp = test::call_service(
            &app,
            json_login("vet@hospital.com", "vet12345", "HOSPITAL").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = response_cookie(&resp, &cookie_name).unwrap();

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["redirect"], "/dashboard");
        assert_eq!(body["data"]["session"]["user"]["role"], "HOSPITAL_VET");
        assert_eq!(body["data"]["session"]["user"]["organizationId"], "hosp-001");

        for (permission, expected) in [("medical:diagnosis", true), ("staff:delete", false)] {
            let req = test::TestRequest::get()
                .uri(&format!("/api/auth/permissions/{}", permission))
                .cookie(cookie.clone())
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["data"]["permission"], permission);
            assert_eq!(body["data"]["granted"], expected, "{permission}");
        }
    }

    #[actix_web::test]
    async fn test_hospital_admin_cannot_prescribe() {
        let test_app = TestApp::new(IdentityFactory::all());
        let cookie_name = test_app.cookie_name();
        let app = test::init_service(create_app(test_app.state.clone())).await;

        let resp = test::call_service(
            &app,
            json_login("admin@hospital.com", "admin123", "HOSPITAL").to_request(),
        )
        .await;
        let cookie = response_cookie(&resp, &cookie_name).unwrap();

        let req = test::TestRequest::get()
            .uri("/api/auth/permissions/medical:prescribe")
            .cookie(cookie)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["granted"], false);
    }

    #[actix_web::test]
    async fn test_login_with_wrong_organization_type_fails() {
        let test_app = TestApp::new(IdentityFactory::all());
        let app = test::init_service(create_app(test_app.state.clone())).await;

        let resp = test::call_service(
            &app,
            json_login("owner@business.com", "owner123", "HOSPITAL").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = test::call_service(
            &app,
            json_login("owner@business.com", "owner123", "BUSINESS").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_unknown_account_and_bad_password_look_the_same() {
        let test_app = TestApp::new(IdentityFactory::all());
        let app = test::init_service(create_app(test_app.state.clone())).await;

        let unknown: Value = test::read_body_json(
            test::call_service(
                &app,
                json_login("ghost@hospital.com", "staff123", "HOSPITAL").to_request(),
            )
            .await,
        )
        .await;
        let wrong: Value = test::read_body_json(
            test::call_service(
                &app,
                json_login("staff@hospital.com", "staff999", "HOSPITAL").to_request(),
            )
            .await,
        )
        .await;

        assert_eq!(unknown["error"]["code"], wrong["error"]["code"]);
        assert_eq!(unknown["error"]["message"], wrong["error"]["message"]);
        assert_eq!(wrong["error"]["message"], "Invalid credentials");
    }

    #[actix_web::test]
    async fn test_deactivated_account_cannot_log_in() {
        let test_app = TestApp::new(IdentityFactory::all());
        test_app.store.set_active("2", false).unwrap();
        let app = test::init_service(create_app(test_app.state.clone())).await;

        let resp = test::call_service(
            &app,
            json_login("staff@hospital.com", "staff123", "HOSPITAL").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_production_cookie_is_secure() {
        let mut config = TestApp::config();
        config.server.environment = Environment::Production;
        let test_app = TestApp::with_config(config, IdentityFactory::all());
        let cookie_name = test_app.cookie_name();
        let app = test::init_service(create_app(test_app.state.clone())).await;

        let resp = test::call_service(
            &app,
            json_login("staff@hospital.com", "staff123", "HOSPITAL").to_request(),
        )
        .await;
        let cookie = response_cookie(&resp, &cookie_name).unwrap();

        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.max_age().map(|age| age.whole_seconds()),
            Some(8 * 3600)
        );
    }

    // ==================== Logout ====================

    #[actix_web::test]
    async fn test_logout_clears_cookie_and_dashboard_redirects_again() {
        let test_app = TestApp::new(IdentityFactory::all());
        let cookie_name = test_app.cookie_name();
        let app = test::init_service(create_app(test_app.state.clone())).await;

        let resp = test::call_service(
            &app,
            json_login("staff@hospital.com", "staff123", "HOSPITAL").to_request(),
        )
        .await;
        let cookie = response_cookie(&resp, &cookie_name).unwrap();

        let req = with_csrf(test::TestRequest::post().uri("/api/auth/logout"))
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_redirect(&resp, StatusCode::SEE_OTHER, "/login");
        assert_cookie_cleared(&resp, &cookie_name);

        // The browser no longer sends a cookie.
        let req = test::TestRequest::get().uri("/dashboard").to_request();
        let resp = test::call_service(&app, req).await;
        assert_redirect(&resp, StatusCode::FOUND, "/login?callbackUrl=/dashboard");
    }
}
