//! Integration tests for pawgate
//!
//! These tests drive the real actix app and in-memory identity store.

pub mod config_tests;
pub mod guard_tests;
pub mod login_flow_tests;
pub mod session_refresh_tests;
