//! Bearer-token middleware for OAuth2 password grant clients
//!
//! `AuthInterceptor` wraps each outbound request: it attaches the current
//! access token, forwards the request, and on a 401 tries a refresh grant,
//! then a password grant, then retries the request once with the new token.
//!
//! Request lifecycle:
//! 1. Attach `authorization: bearer <token>` unless the caller set the header
//! 2. Send through `Next` (normally a `reqwest::Client`)
//! 3. Non-401 responses are returned as-is
//! 4. On 401: refresh grant, falling back to password grant
//! 5. With new tokens: replace the header and send once more
//! 6. Without: return the original 401
//!
//! Retrying requires a clonable request. Requests with streaming bodies are
//! sent once; on a 401 the tokens are still renewed but the 401 is returned.

pub mod client;
pub mod error;
pub mod interceptor;
pub mod metrics;
pub mod next;

pub use client::AuthenticatedClient;
pub use error::{Error, Result};
pub use interceptor::AuthInterceptor;
pub use next::Next;
