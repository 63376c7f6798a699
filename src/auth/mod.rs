//! Request authentication for the IAT WebSocket endpoint
//!
//! The service authenticates a connection through query parameters on the
//! upgrade URL: an RFC-1123 `date`, the `host`, and an `authorization` value
//! carrying an HMAC-SHA256 signature over both plus the request line.

mod credentials;
mod signer;

pub use credentials::Credentials;
pub use signer::{rfc1123, sign_url, signature, ConnectionRequest};
