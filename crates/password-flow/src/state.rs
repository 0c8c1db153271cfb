//! In-memory credential state for one client session
//!
//! Username and password are fixed at construction. Tokens and scope change
//! only through `update()`, which replaces all three at once with whatever the
//! token endpoint returned. Nothing is persisted.

use common::Secret;

use crate::token::{AccessTokenRequest, RefreshTokenRequest, TokenSuccessResponse};

/// Login credentials plus the current token set.
#[derive(Debug, Clone, Default)]
pub struct CredentialState {
    username: Option<String>,
    password: Option<Secret<String>>,
    access_token: Option<Secret<String>>,
    refresh_token: Option<Secret<String>>,
    scope: Option<String>,
}

impl CredentialState {
    /// Create a state with login credentials and no tokens.
    ///
    /// Either credential may be `None`; login is then inapplicable and only a
    /// pre-seeded refresh token can recover from a 401.
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self {
            username,
            password: password.map(Secret::new),
            ..Self::default()
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(Secret::new(token.into()));
        self
    }

    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(Secret::new(token.into()));
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(|t| t.expose().as_str())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(|t| t.expose().as_str())
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Payload for a password grant, or `None` when username or password is missing.
    pub fn access_token_request(&self) -> Option<AccessTokenRequest> {
        let (Some(username), Some(password)) = (&self.username, &self.password) else {
            return None;
        };
        Some(AccessTokenRequest {
            username: username.clone(),
            password: password.clone(),
            scope: self.scope.clone(),
        })
    }

    /// Payload for a refresh grant, or `None` when no refresh token is held.
    pub fn refresh_token_request(&self) -> Option<RefreshTokenRequest> {
        let refresh_token = self.refresh_token.as_ref()?;
        Some(RefreshTokenRequest {
            refresh_token: refresh_token.clone(),
            scope: self.scope.clone(),
        })
    }

    /// Replace tokens and scope with the response fields. Absent fields clear
    /// the stored value; nothing is merged with the previous token set.
    pub fn update(&mut self, response: &TokenSuccessResponse) {
        self.access_token = Some(Secret::new(response.access_token.clone()));
        self.refresh_token = response.refresh_token.clone().map(Secret::new);
        self.scope = response.scope.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_state() -> CredentialState {
        CredentialState::new(Some("alice".into()), Some("s3cret".into()))
    }

    #[test]
    fn access_token_request_requires_username() {
        let state = CredentialState::new(None, Some("s3cret".into()));
        assert!(state.access_token_request().is_none());
    }

    #[test]
    fn access_token_request_requires_password() {
        let state = CredentialState::new(Some("alice".into()), None);
        assert!(state.access_token_request().is_none());
    }

    #[test]
    fn access_token_request_passes_scope_through() {
        let request = login_state().access_token_request().unwrap();
        assert_eq!(request.username, "alice");
        assert_eq!(request.password.expose(), "s3cret");
        assert!(request.scope.is_none());

        let request = login_state()
            .with_scope("read")
            .access_token_request()
            .unwrap();
        assert_eq!(request.scope.as_deref(), Some("read"));
    }

    #[test]
    fn refresh_token_request_requires_refresh_token() {
        let state = login_state().with_access_token("at_1");
        assert!(state.refresh_token_request().is_none());
    }

    #[test]
    fn refresh_token_request_carries_token_and_scope() {
        let state = CredentialState::default()
            .with_refresh_token("rt_1")
            .with_scope("read");
        let request = state.refresh_token_request().unwrap();
        assert_eq!(request.refresh_token.expose(), "rt_1");
        assert_eq!(request.scope.as_deref(), Some("read"));
    }

    #[test]
    fn update_overwrites_without_merging() {
        let mut state = login_state();
        state.update(
            &TokenSuccessResponse::new("at_1")
                .with_refresh_token("rt_1")
                .with_scope("read"),
        );
        assert_eq!(state.access_token(), Some("at_1"));
        assert_eq!(state.refresh_token(), Some("rt_1"));
        assert_eq!(state.scope(), Some("read"));

        // Second response has no refresh token or scope: both are cleared
        state.update(&TokenSuccessResponse::new("at_2"));
        assert_eq!(state.access_token(), Some("at_2"));
        assert_eq!(state.refresh_token(), None);
        assert_eq!(state.scope(), None);
    }

    #[test]
    fn update_leaves_login_credentials_alone() {
        let mut state = login_state();
        state.update(&TokenSuccessResponse::new("at_1"));
        assert_eq!(state.username(), Some("alice"));
        assert!(state.access_token_request().is_some());
    }

    #[test]
    fn debug_does_not_leak_secrets() {
        let state = login_state()
            .with_access_token("at_secret")
            .with_refresh_token("rt_secret");
        let debug = format!("{state:?}");
        assert!(!debug.contains("s3cret"), "got: {debug}");
        assert!(!debug.contains("at_secret"), "got: {debug}");
        assert!(!debug.contains("rt_secret"), "got: {debug}");
    }
}
