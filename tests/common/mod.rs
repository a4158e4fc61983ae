//! Common test utilities for pawgate
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{TestApp, fixtures::IdentityFactory};
//!
//! #[actix_web::test]
//! async fn my_test() {
//!     let app = TestApp::new(vec![IdentityFactory::vet()]);
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod fixtures;

// Re-export commonly used items
pub use fixtures::{IdentityFactory, TEST_CSRF_TOKEN, TestApp, with_csrf};
