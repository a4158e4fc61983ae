//! Session refresh and expiry against an injected clock

#[cfg(test)]
mod tests {
    use crate::common::{IdentityFactory, TestApp};
    use actix_web::cookie::Cookie;
    use actix_web::test;
    use chrono::{Duration, Utc};
    use pawgate::server::middleware::resolve_session;
    use pawgate::{LoginCredentials, Permission, UserRole};

    fn staff_credentials() -> LoginCredentials {
        LoginCredentials {
            email: "staff@hospital.com".to_string(),
            password: "staff123".to_string(),
            organization_type: "HOSPITAL".to_string(),
            callback_url: None,
            csrf_token: None,
        }
    }

    #[tokio::test]
    async fn test_permissions_frozen_until_refresh_window() {
        let test_app = TestApp::new(IdentityFactory::all());
        let state = test_app.state.clone();
        let t0 = Utc::now();

        let (_, token) = state
            .auth
            .issue_session_at(&staff_credentials(), t0)
            .await
            .unwrap();
        test_app.store.set_role("2", UserRole::HospitalVet).unwrap();

        let req = test::TestRequest::default()
            .cookie(Cookie::new(test_app.cookie_name(), token))
            .to_http_request();

        // Inside the window the old snapshot stands and no cookie is re-issued.
        let resolved = resolve_session(&state, &req, t0 + Duration::minutes(10)).await;
        let session = resolved.session.unwrap();
        assert_eq!(session.role, UserRole::HospitalStaff);
        assert!(!session.permissions.contains(Permission::MedicalPrescribe));
        assert!(resolved.cookie.is_none());

        // Past the window the role change lands and a new cookie is issued.
        let resolved = resolve_session(&state, &req, t0 + Duration::minutes(16)).await;
        let session = resolved.session.unwrap();
        assert_eq!(session.role, UserRole::HospitalVet);
        assert!(session.permissions.contains(Permission::MedicalPrescribe));
        let cookie = resolved.cookie.unwrap();
        assert!(!cookie.value().is_empty());

        let refreshed = state
            .auth
            .authenticate_token_at(cookie.value(), t0 + Duration::minutes(17))
            .unwrap();
        assert_eq!(refreshed.role, UserRole::HospitalVet);
    }

    #[tokio::test]
    async fn test_session_expires_after_eight_hours() {
        let test_app = TestApp::new(IdentityFactory::all());
        let state = test_app.state.clone();
        let t0 = Utc::now();

        let (_, token) = state
            .auth
            .issue_session_at(&staff_credentials(), t0)
            .await
            .unwrap();
        let req = test::TestRequest::default()
            .cookie(Cookie::new(test_app.cookie_name(), token))
            .to_http_request();

        let resolved = resolve_session(&state, &req, t0 + Duration::minutes(7 * 60 + 59)).await;
        assert!(resolved.session.is_some());

        let resolved = resolve_session(&state, &req, t0 + Duration::minutes(8 * 60 + 1)).await;
        assert!(resolved.session.is_none());
        assert_eq!(resolved.cookie.unwrap().value(), "");
    }

    #[tokio::test]
    async fn test_refresh_does_not_extend_lifetime() {
        let test_app = TestApp::new(IdentityFactory::all());
        let state = test_app.state.clone();
        let t0 = Utc::now();

        let (original, token) = state
            .auth
            .issue_session_at(&staff_credentials(), t0)
            .await
            .unwrap();
        let req = test::TestRequest::default()
            .cookie(Cookie::new(test_app.cookie_name(), token))
            .to_http_request();

        let resolved = resolve_session(&state, &req, t0 + Duration::hours(7)).await;
        let refreshed = resolved.session.unwrap();
        assert_eq!(refreshed.expires_at, original.expires_at);
        assert_eq!(refreshed.session_id, original.session_id);
    }

    #[tokio::test]
    async fn test_deactivation_ends_session_at_next_refresh() {
        let test_app = TestApp::new(IdentityFactory::all());
        let state = test_app.state.clone();
        let t0 = Utc::now();

        let (_, token) = state
            .auth
            .issue_session_at(&staff_credentials(), t0)
            .await
            .unwrap();
        test_app.store.set_active("2", false).unwrap();

        let req = test::TestRequest::default()
            .cookie(Cookie::new(test_app.cookie_name(), token))
            .to_http_request();

        let resolved = resolve_session(&state, &req, t0 + Duration::minutes(5)).await;
        assert!(resolved.session.is_some());

        let resolved = resolve_session(&state, &req, t0 + Duration::minutes(15)).await;
        assert!(resolved.session.is_none());
        assert_eq!(resolved.cookie.unwrap().value(), "");
    }
}
