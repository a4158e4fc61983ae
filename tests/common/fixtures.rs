//! Test fixtures and data factories
//!
//! Identities carry real Argon2 hashes. Hashing is slow, so each password is
//! hashed once per test binary.

use actix_web::cookie::Cookie;
use actix_web::{test, web};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use pawgate::auth::password::hash_password;
use pawgate::server::AppState;
use pawgate::{AuthSystem, Config, IdentityRecord, InMemoryIdentityStore, UserRole};
use std::collections::HashMap;
use std::sync::Arc;

/// Secret used by every test app
pub const TEST_SECRET: &str = "Integration-Test-Secret-For-Sessions-0123";

/// CSRF token paired with the cookie set by [`with_csrf`]
pub const TEST_CSRF_TOKEN: &str = "integration-test-csrf-token";

static HASHES: Lazy<Mutex<HashMap<String, String>>> = Lazy::new(|| Mutex::new(HashMap::new()));

fn hashed(password: &str) -> String {
    HASHES
        .lock()
        .entry(password.to_string())
        .or_insert_with(|| hash_password(password).unwrap())
        .clone()
}

/// Factory for creating test identities
///
/// Passwords follow the demo accounts: `<role prefix>123`.
pub struct IdentityFactory;

impl IdentityFactory {
    /// Identity with an explicit role and password
    pub fn create(id: &str, email: &str, password: &str, role: UserRole, org: &str) -> IdentityRecord {
        IdentityRecord {
            id: id.to_string(),
            email: email.to_string(),
            name: Some(format!("Test {}", role)),
            password_hash: hashed(password),
            role,
            organization_id: org.to_string(),
            is_active: true,
        }
    }

    pub fn hospital_admin() -> IdentityRecord {
        Self::create("1", "admin@hospital.com", "admin123", UserRole::HospitalAdmin, "hosp-001")
    }

    pub fn staff() -> IdentityRecord {
        Self::create("2", "staff@hospital.com", "staff123", UserRole::HospitalStaff, "hosp-001")
    }

    pub fn vet() -> IdentityRecord {
        Self::create("3", "vet@hospital.com", "vet12345", UserRole::HospitalVet, "hosp-001")
    }

    pub fn business_owner() -> IdentityRecord {
        Self::create("4", "owner@business.com", "owner123", UserRole::BusinessOwner, "biz-001")
    }

    /// Every demo identity
    pub fn all() -> Vec<IdentityRecord> {
        vec![
            Self::hospital_admin(),
            Self::staff(),
            Self::vet(),
            Self::business_owner(),
        ]
    }
}

/// Application state plus a handle on its identity store
pub struct TestApp {
    pub state: web::Data<AppState>,
    pub store: Arc<InMemoryIdentityStore>,
}

impl TestApp {
    pub fn new(identities: Vec<IdentityRecord>) -> Self {
        Self::with_config(Self::config(), identities)
    }

    pub fn with_config(config: Config, identities: Vec<IdentityRecord>) -> Self {
        let store = Arc::new(InMemoryIdentityStore::with_identities(identities).unwrap());
        let auth = AuthSystem::new(&config.auth, store.clone()).unwrap();
        Self {
            state: web::Data::new(AppState::new(config, auth)),
            store,
        }
    }

    /// Default configuration with a fixed secret
    pub fn config() -> Config {
        let mut config = Config::default();
        config.auth.jwt_secret = TEST_SECRET.to_string();
        config
    }

    pub fn cookie_name(&self) -> String {
        self.state.config.auth.cookie.name.clone()
    }
}

/// Attach the CSRF cookie and echo its token in the header
pub fn with_csrf(request: test::TestRequest) -> test::TestRequest {
    request
        .cookie(Cookie::new(
            pawgate::config::CookieConfig::default().csrf_name,
            TEST_CSRF_TOKEN,
        ))
        .insert_header((pawgate::auth::csrf::CSRF_HEADER, TEST_CSRF_TOKEN))
}
