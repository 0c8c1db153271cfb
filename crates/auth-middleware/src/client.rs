//! reqwest client with the interceptor in front of it

use std::sync::Arc;

use password_flow::{CredentialState, PasswordFlow, PasswordFlowClient};

use crate::error::Result;
use crate::interceptor::AuthInterceptor;

/// A `reqwest::Client` whose requests go through an `AuthInterceptor`.
///
/// The same client sends the API requests and the token requests. Cloning is
/// cheap and clones share credentials.
#[derive(Clone)]
pub struct AuthenticatedClient {
    http: reqwest::Client,
    interceptor: Arc<AuthInterceptor>,
}

impl AuthenticatedClient {
    pub fn new(http: reqwest::Client, flow: PasswordFlow, state: CredentialState) -> Self {
        let exchange = Arc::new(PasswordFlowClient::new(http.clone(), flow));
        Self {
            http,
            interceptor: Arc::new(AuthInterceptor::new(state, exchange)),
        }
    }

    pub fn interceptor(&self) -> &AuthInterceptor {
        &self.interceptor
    }

    /// Start building a request against the wrapped client.
    pub fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http.request(method, url)
    }

    /// Send a request, renewing credentials and retrying once on a 401.
    pub async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        self.interceptor.intercept(request, &self.http).await
    }
}
