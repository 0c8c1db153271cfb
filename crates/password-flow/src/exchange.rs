//! Token exchange abstraction
//!
//! The interceptor talks to the token endpoint through `TokenExchange` so the
//! transport can be swapped (the reqwest-backed `PasswordFlowClient` in
//! production, scripted fakes in tests).
//!
//! An endpoint that answers with a non-success status yields
//! `TokenGrant::Rejected` rather than an error. Callers match on it to fall
//! back to the next grant; `Err` is reserved for transport and decoding
//! failures, which should propagate.

use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::token::{AccessTokenRequest, RefreshTokenRequest, TokenErrorResponse, TokenSuccessResponse};

/// Outcome of a token request that reached the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenGrant {
    Granted(TokenSuccessResponse),
    Rejected(TokenRejection),
}

impl TokenGrant {
    /// The success response, discarding a rejection.
    pub fn granted(self) -> Option<TokenSuccessResponse> {
        match self {
            TokenGrant::Granted(response) => Some(response),
            TokenGrant::Rejected(_) => None,
        }
    }
}

/// Non-success reply from the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRejection {
    pub status: u16,
    /// Parsed RFC 6749 error body, when the endpoint sent one
    pub error: Option<TokenErrorResponse>,
    pub body: String,
}

impl TokenRejection {
    /// Short label for logs: the OAuth error code if present, else the status.
    pub fn reason(&self) -> String {
        match self.error {
            Some(ref error) => error.error.clone(),
            None => format!("status {}", self.status),
        }
    }
}

/// Client for the two grants of a password flow.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility.
pub trait TokenExchange: Send + Sync {
    /// Exchange username/password for tokens (`grant_type=password`).
    fn request_access_token<'a>(
        &'a self,
        request: &'a AccessTokenRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TokenGrant>> + Send + 'a>>;

    /// Exchange a refresh token for tokens (`grant_type=refresh_token`).
    fn request_refresh_token<'a>(
        &'a self,
        request: &'a RefreshTokenRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TokenGrant>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granted_extracts_success_response() {
        let grant = TokenGrant::Granted(TokenSuccessResponse::new("at_1"));
        assert_eq!(grant.granted().unwrap().access_token, "at_1");
    }

    #[test]
    fn rejected_yields_nothing() {
        let grant = TokenGrant::Rejected(TokenRejection {
            status: 400,
            error: None,
            body: String::new(),
        });
        assert!(grant.granted().is_none());
    }

    #[test]
    fn rejection_reason_prefers_oauth_error_code() {
        let rejection = TokenRejection {
            status: 400,
            error: Some(TokenErrorResponse {
                error: "invalid_grant".into(),
                error_description: None,
                error_uri: None,
            }),
            body: r#"{"error":"invalid_grant"}"#.into(),
        };
        assert_eq!(rejection.reason(), "invalid_grant");

        let bare = TokenRejection {
            status: 503,
            error: None,
            body: "<html>".into(),
        };
        assert_eq!(bare.reason(), "status 503");
    }
}
