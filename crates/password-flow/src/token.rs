//! Token endpoint request and response models
//!
//! Requests are sent as `application/x-www-form-urlencoded` bodies (RFC 6749
//! §4.3.2 and §6). Responses follow §5.1 (success) and §5.2 (error).

use common::Secret;
use serde::{Deserialize, Serialize};

/// Payload for `grant_type=password`.
#[derive(Debug, Clone)]
pub struct AccessTokenRequest {
    pub username: String,
    pub password: Secret<String>,
    pub scope: Option<String>,
}

impl AccessTokenRequest {
    /// Form fields in the order they are sent. `scope` is omitted when absent.
    pub fn form(&self) -> Vec<(&'static str, &str)> {
        let mut form = vec![
            ("grant_type", "password"),
            ("username", self.username.as_str()),
            ("password", self.password.expose().as_str()),
        ];
        if let Some(ref scope) = self.scope {
            form.push(("scope", scope.as_str()));
        }
        form
    }
}

/// Payload for `grant_type=refresh_token`.
#[derive(Debug, Clone)]
pub struct RefreshTokenRequest {
    pub refresh_token: Secret<String>,
    pub scope: Option<String>,
}

impl RefreshTokenRequest {
    pub fn form(&self) -> Vec<(&'static str, &str)> {
        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", self.refresh_token.expose().as_str()),
        ];
        if let Some(ref scope) = self.scope {
            form.push(("scope", scope.as_str()));
        }
        form
    }
}

/// Successful token endpoint reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenSuccessResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Seconds until the access token expires (informational only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

impl TokenSuccessResponse {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: None,
            refresh_token: None,
            scope: None,
            expires_in: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

/// Error body of a rejected token request, e.g. `{"error":"invalid_grant"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_form_includes_grant_type_and_credentials() {
        let request = AccessTokenRequest {
            username: "alice".into(),
            password: Secret::new("s3cret".into()),
            scope: Some("read write".into()),
        };
        assert_eq!(
            request.form(),
            vec![
                ("grant_type", "password"),
                ("username", "alice"),
                ("password", "s3cret"),
                ("scope", "read write"),
            ]
        );
    }

    #[test]
    fn refresh_form_omits_absent_scope() {
        let request = RefreshTokenRequest {
            refresh_token: Secret::new("rt_1".into()),
            scope: None,
        };
        assert_eq!(
            request.form(),
            vec![("grant_type", "refresh_token"), ("refresh_token", "rt_1")]
        );
    }

    #[test]
    fn request_debug_redacts_secrets() {
        let request = AccessTokenRequest {
            username: "alice".into(),
            password: Secret::new("s3cret".into()),
            scope: None,
        };
        let debug = format!("{request:?}");
        assert!(!debug.contains("s3cret"), "got: {debug}");
        assert!(debug.contains("alice"));
    }

    #[test]
    fn success_response_with_only_access_token() {
        let json = r#"{"access_token":"at_abc","token_type":"bearer"}"#;
        let token: TokenSuccessResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "at_abc");
        assert_eq!(token.token_type.as_deref(), Some("bearer"));
        assert!(token.refresh_token.is_none());
        assert!(token.scope.is_none());
        assert!(token.expires_in.is_none());
    }

    #[test]
    fn success_response_full() {
        let json = r#"{"access_token":"at","refresh_token":"rt","scope":"read","expires_in":3600}"#;
        let token: TokenSuccessResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            token,
            TokenSuccessResponse {
                expires_in: Some(3600),
                ..TokenSuccessResponse::new("at")
                    .with_refresh_token("rt")
                    .with_scope("read")
            }
        );
    }

    #[test]
    fn error_response_deserializes() {
        let json = r#"{"error":"invalid_grant","error_description":"bad password"}"#;
        let err: TokenErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(err.error, "invalid_grant");
        assert_eq!(err.error_description.as_deref(), Some("bad password"));
        assert!(err.error_uri.is_none());
    }
}
