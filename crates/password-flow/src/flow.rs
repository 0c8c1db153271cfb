//! Password flow endpoint configuration
//!
//! The shape follows the OpenAPI `OAuthFlowPassword` object: a token URL, an
//! optional refresh URL, and the scopes the flow advertises.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Endpoints and scopes of one OAuth2 password flow.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordFlow {
    pub token_url: String,
    /// Refresh grants go here when set, otherwise to `token_url`
    #[serde(default)]
    pub refresh_url: Option<String>,
    /// Scope name to human-readable description. Descriptive only: the scope
    /// sent with a grant comes from `CredentialState`, not from this map.
    #[serde(default)]
    pub scopes: BTreeMap<String, String>,
}

impl PasswordFlow {
    pub fn new(token_url: impl Into<String>) -> Result<Self> {
        let flow = Self {
            token_url: token_url.into(),
            refresh_url: None,
            scopes: BTreeMap::new(),
        };
        flow.validate()?;
        Ok(flow)
    }

    pub fn with_refresh_url(mut self, refresh_url: impl Into<String>) -> Result<Self> {
        self.refresh_url = Some(refresh_url.into());
        self.validate()?;
        Ok(self)
    }

    pub fn with_scope(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.scopes.insert(name.into(), description.into());
        self
    }

    /// Check that every configured endpoint is an http(s) URL.
    ///
    /// Deserialized flows skip the constructors, so callers loading a flow
    /// from config must call this themselves.
    pub fn validate(&self) -> Result<()> {
        check_url("token_url", &self.token_url)?;
        if let Some(ref refresh_url) = self.refresh_url {
            check_url("refresh_url", refresh_url)?;
        }
        Ok(())
    }

    /// Endpoint for `grant_type=refresh_token` requests.
    pub fn refresh_endpoint(&self) -> &str {
        self.refresh_url.as_deref().unwrap_or(&self.token_url)
    }
}

fn check_url(field: &str, url: &str) -> Result<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Error::InvalidFlow(format!(
            "{field} must start with http:// or https://, got: {url}"
        )));
    }
    Ok(())
}
