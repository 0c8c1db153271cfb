//! OAuth2 password grant client
//!
//! Holds the in-memory credential state for one client session and talks to
//! the token endpoint of a single password flow. The crate knows nothing about
//! the requests being authorized; the interceptor in `auth-middleware` drives
//! it.
//!
//! Credential flow:
//! 1. Caller builds a `CredentialState` with username/password (optionally pre-seeded tokens)
//! 2. `CredentialState::refresh_token_request()` / `access_token_request()` derive the grant payloads
//! 3. A `TokenExchange` implementation (normally `PasswordFlowClient`) posts them to the token endpoint
//! 4. A `TokenGrant::Granted` response is applied with `CredentialState::update()`

pub mod client;
pub mod error;
pub mod exchange;
pub mod flow;
pub mod state;
pub mod token;

pub use client::PasswordFlowClient;
pub use error::{Error, Result};
pub use exchange::{TokenExchange, TokenGrant, TokenRejection};
pub use flow::PasswordFlow;
pub use state::CredentialState;
pub use token::{AccessTokenRequest, RefreshTokenRequest, TokenErrorResponse, TokenSuccessResponse};
