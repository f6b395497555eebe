//! Per-request session state, carried in a signed cookie.

pub mod codec;
pub mod extract;

pub use codec::{SessionClaims, SessionCodec};
pub use extract::Session;
