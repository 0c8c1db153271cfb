//! Request interception and the 401 recovery protocol
//!
//! The credential state lives behind a `RwLock` so concurrent requests can
//! attach the current token without waiting on each other. Recovery
//! (refresh, then login) runs under a separate mutex: only one request at a
//! time talks to the token endpoint, and a request that waited while another
//! one recovered reuses that outcome instead of exchanging again: the new
//! token on success, the original 401 on failure.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use password_flow::{CredentialState, TokenExchange, TokenGrant, TokenSuccessResponse};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::metrics::{GRANT_PASSWORD, GRANT_REFRESH, record_exchange, record_retry};
use crate::next::Next;

/// Attaches bearer tokens and recovers from 401 responses.
///
/// One interceptor owns one `CredentialState` for the lifetime of a client
/// session. Share it across tasks with `Arc`.
pub struct AuthInterceptor {
    state: RwLock<CredentialState>,
    exchange: Arc<dyn TokenExchange>,
    exchange_guard: Mutex<()>,
    /// Recoveries that reached an outcome (tokens or none); errors are not counted
    recoveries: AtomicU64,
}

impl AuthInterceptor {
    pub fn new(state: CredentialState, exchange: Arc<dyn TokenExchange>) -> Self {
        Self {
            state: RwLock::new(state),
            exchange,
            exchange_guard: Mutex::new(()),
            recoveries: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current credential state.
    pub async fn credentials(&self) -> CredentialState {
        self.state.read().await.clone()
    }

    /// Send `request` through `next`, renewing credentials and retrying once
    /// on a 401.
    ///
    /// The caller's `authorization` header wins on the first attempt; the
    /// retry always carries the freshly issued token. If neither grant yields
    /// tokens, the original 401 response is returned. Only transport errors
    /// and token endpoint failures other than a rejection are returned as
    /// `Err`.
    ///
    /// The retry sends a clone taken before the first attempt. Requests with
    /// streaming bodies cannot be cloned and are never retried.
    pub async fn intercept<N>(&self, mut request: reqwest::Request, next: &N) -> Result<reqwest::Response>
    where
        N: Next + ?Sized,
    {
        let sent_with = self.state.read().await.access_token().map(str::to_owned);
        if let Some(ref token) = sent_with {
            set_access_header(&mut request, token, false)?;
        }

        let retry = request.try_clone();
        let response = next.run(request).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(url = %response.url(), "received 401, renewing credentials");
        let observed = self.recoveries.load(Ordering::SeqCst);
        let Some(token) = self.renew(sent_with.as_deref(), observed).await? else {
            debug!("no credentials obtained, returning 401");
            return Ok(response);
        };

        let Some(mut retry) = retry else {
            warn!(url = %response.url(), "request body is not clonable, returning 401 without retry");
            record_retry("skipped");
            return Ok(response);
        };

        set_access_header(&mut retry, &token, true)?;
        record_retry("sent");
        Ok(next.run(retry).await?)
    }

    /// Obtain a new access token, serialized with other recovering requests.
    ///
    /// `sent_with` is the token the failed request was sent with. If the
    /// state already holds a different one, a concurrent request renewed it
    /// and that token is used as-is. `observed` is the recovery count seen
    /// when the 401 arrived; if a recovery finished since then without
    /// changing the token, it failed and is not repeated.
    async fn renew(&self, sent_with: Option<&str>, observed: u64) -> Result<Option<String>> {
        let _guard = self.exchange_guard.lock().await;

        let current = self.state.read().await.access_token().map(str::to_owned);
        if current.is_some() && current.as_deref() != sent_with {
            debug!("credentials already renewed by a concurrent request");
            return Ok(current);
        }
        if self.recoveries.load(Ordering::SeqCst) != observed {
            debug!("concurrent recovery obtained no credentials");
            return Ok(None);
        }

        let tokens = self.refresh_or_login().await?;
        self.recoveries.fetch_add(1, Ordering::SeqCst);
        Ok(tokens.map(|t| t.access_token))
    }

    async fn refresh_or_login(&self) -> Result<Option<TokenSuccessResponse>> {
        match self.refresh().await? {
            Some(tokens) => Ok(Some(tokens)),
            None => self.login().await,
        }
    }

    /// Run a password grant with the stored username/password.
    ///
    /// Returns `None` when either credential is missing or the endpoint
    /// rejects the grant. Not serialized with `intercept`'s recovery.
    pub async fn login(&self) -> Result<Option<TokenSuccessResponse>> {
        let Some(request) = self.state.read().await.access_token_request() else {
            debug!("no username/password configured, skipping password grant");
            return Ok(None);
        };
        let grant = self
            .exchange
            .request_access_token(&request)
            .await
            .inspect_err(|_| record_exchange(GRANT_PASSWORD, "error"))?;
        Ok(self.apply(GRANT_PASSWORD, grant).await)
    }

    /// Run a refresh grant with the stored refresh token.
    ///
    /// Returns `None` when no refresh token is held or the endpoint rejects
    /// the grant. Not serialized with `intercept`'s recovery.
    pub async fn refresh(&self) -> Result<Option<TokenSuccessResponse>> {
        let Some(request) = self.state.read().await.refresh_token_request() else {
            debug!("no refresh token held, skipping refresh grant");
            return Ok(None);
        };
        let grant = self
            .exchange
            .request_refresh_token(&request)
            .await
            .inspect_err(|_| record_exchange(GRANT_REFRESH, "error"))?;
        Ok(self.apply(GRANT_REFRESH, grant).await)
    }

    async fn apply(&self, grant_type: &'static str, grant: TokenGrant) -> Option<TokenSuccessResponse> {
        match grant {
            TokenGrant::Granted(response) => {
                self.state.write().await.update(&response);
                record_exchange(grant_type, "granted");
                info!(grant = grant_type, "token grant succeeded");
                Some(response)
            }
            TokenGrant::Rejected(rejection) => {
                record_exchange(grant_type, "rejected");
                warn!(
                    grant = grant_type,
                    status = rejection.status,
                    reason = %rejection.reason(),
                    "token grant rejected"
                );
                None
            }
        }
    }
}

/// Set `authorization: bearer <token>`. Without `replace`, an existing header is kept.
fn set_access_header(request: &mut reqwest::Request, token: &str, replace: bool) -> Result<()> {
    let headers = request.headers_mut();
    if !replace && headers.contains_key(AUTHORIZATION) {
        return Ok(());
    }
    let mut value = HeaderValue::from_str(&format!("bearer {token}"))
        .map_err(|e| Error::InvalidToken(e.to_string()))?;
    value.set_sensitive(true);
    headers.insert(AUTHORIZATION, value);
    Ok(())
}
