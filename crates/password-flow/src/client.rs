//! reqwest-backed token endpoint client
//!
//! Both grants POST a form body. Password grants go to the flow's token URL,
//! refresh grants to its refresh URL (falling back to the token URL).

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::error::{Error, Result};
use crate::exchange::{TokenExchange, TokenGrant, TokenRejection};
use crate::flow::PasswordFlow;
use crate::token::{AccessTokenRequest, RefreshTokenRequest, TokenErrorResponse, TokenSuccessResponse};

/// Token endpoint client bound to one password flow.
#[derive(Debug, Clone)]
pub struct PasswordFlowClient {
    http: reqwest::Client,
    flow: PasswordFlow,
}

impl PasswordFlowClient {
    pub fn new(http: reqwest::Client, flow: PasswordFlow) -> Self {
        Self { http, flow }
    }

    pub fn flow(&self) -> &PasswordFlow {
        &self.flow
    }

    /// Exchange username/password for tokens.
    pub async fn request_access_token(&self, request: &AccessTokenRequest) -> Result<TokenGrant> {
        post_grant(&self.http, &self.flow.token_url, "password", &request.form()).await
    }

    /// Exchange a refresh token for tokens.
    pub async fn request_refresh_token(&self, request: &RefreshTokenRequest) -> Result<TokenGrant> {
        post_grant(
            &self.http,
            self.flow.refresh_endpoint(),
            "refresh_token",
            &request.form(),
        )
        .await
    }
}

impl TokenExchange for PasswordFlowClient {
    fn request_access_token<'a>(
        &'a self,
        request: &'a AccessTokenRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TokenGrant>> + Send + 'a>> {
        Box::pin(PasswordFlowClient::request_access_token(self, request))
    }

    fn request_refresh_token<'a>(
        &'a self,
        request: &'a RefreshTokenRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TokenGrant>> + Send + 'a>> {
        Box::pin(PasswordFlowClient::request_refresh_token(self, request))
    }
}

async fn post_grant(
    http: &reqwest::Client,
    url: &str,
    grant: &str,
    form: &[(&str, &str)],
) -> Result<TokenGrant> {
    debug!(url, grant, "requesting token");

    let response = http
        .post(url)
        .form(form)
        .send()
        .await
        .map_err(|e| Error::Http(format!("{grant} grant request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        let error = serde_json::from_str::<TokenErrorResponse>(&body).ok();
        return Ok(TokenGrant::Rejected(TokenRejection {
            status: status.as_u16(),
            error,
            body,
        }));
    }

    response
        .json::<TokenSuccessResponse>()
        .await
        .map(TokenGrant::Granted)
        .map_err(|e| Error::InvalidResponse(format!("{grant} grant: {e}")))
}
