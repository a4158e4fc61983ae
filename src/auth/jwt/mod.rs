//! Session token codec
//!
//! Sessions travel as HS256-signed JWTs. The token is the session: every claim
//! needed to rebuild a [`crate::auth::session::Session`] is embedded.

mod handler;
pub mod types;
mod utils;


pub use types::{SessionClaims, TokenCodec};
pub use utils::extract_bearer;
