//! Error types for intercepted requests
//!
//! A rejected token grant never shows up here: the caller gets the original
//! 401 response instead. These variants are the failures that propagate.

/// Errors from `AuthInterceptor::intercept`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("token endpoint error: {0}")]
    TokenEndpoint(#[from] password_flow::Error),

    #[error("access token is not a valid header value: {0}")]
    InvalidToken(String),
}

/// Result alias for intercepted requests.
pub type Result<T> = std::result::Result<T, Error>;
