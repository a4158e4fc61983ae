//! Configuration loading and server construction

#[cfg(test)]
mod tests {
    use actix_web::{test as actix_test, web};
    use pawgate::Config;
    use pawgate::server::builder::load_config;
    use pawgate::server::{ServerBuilder, create_app};

    // ==================== Loading ====================

    #[tokio::test]
    async fn test_example_config_is_valid() {
        let config = Config::from_file("config/pawgate.yaml.example")
            .await
            .unwrap();

        assert_eq!(config.identities.len(), 4);
        assert_eq!(config.server.port, 3100);
        assert_eq!(config.auth.session_max_age, 28800);
        assert_eq!(config.auth.session_update_age, 900);
        assert_eq!(config.guard.callback_param, "callbackUrl");
    }

    #[tokio::test]
    async fn test_missing_config_file_falls_back_to_defaults() {
        let config = load_config("/nonexistent/pawgate.yaml").await.unwrap();
        assert!(config.identities.is_empty());
        assert!(config.auth.jwt_secret.len() >= 32);
    }

    #[test]
    fn test_invalid_session_timing_rejected() {
        let yaml = r#"
auth:
  jwt_secret: "Config-Test-Secret-That-Is-Long-Enough-42"
  session_max_age: 600
  session_update_age: 900
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_login_path_inside_protected_area_rejected() {
        let yaml = r#"
guard:
  login_path: /dashboard/login
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    // ==================== Server construction ====================

    #[test]
    fn test_builder_requires_config() {
        assert!(ServerBuilder::new().build().is_err());
    }

    #[actix_web::test]
    async fn test_server_from_example_config_serves_health() {
        let config = Config::from_file("config/pawgate.yaml.example")
            .await
            .unwrap();
        let server = ServerBuilder::new().with_config(config).build().unwrap();

        let app =
            actix_test::init_service(create_app(web::Data::new(server.state().clone()))).await;
        let req = actix_test::TestRequest::get().uri("/health").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
