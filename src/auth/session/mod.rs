//! Authenticated session model
//!
//! A [`Session`] carries the principal's identity together with a frozen copy
//! of the role's permission set taken at issuance or the last refresh.

mod lifecycle;
mod types;

pub use types::{IdentityContext, Session, SessionPolicy, SessionState};
