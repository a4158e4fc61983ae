//! HTTP middleware implementations
//!
//! - Session guard: session resolution, refresh and route protection
//! - Request ID tracking

mod request_id;
mod session_guard;

pub use request_id::{RequestIdMiddleware, RequestIdMiddlewareService};
pub use session_guard::{
    ResolvedSession, SessionGuardMiddleware, SessionGuardMiddlewareService, current_session,
    resolve_session,
};

/// Identity headers set for downstream handlers
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const ORG_ID_HEADER: &str = "x-org-id";
