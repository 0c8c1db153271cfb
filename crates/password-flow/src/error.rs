//! Error types for token endpoint operations
//!
//! A token endpoint that answers with a non-success status is not an error
//! here; it is reported as `TokenGrant::Rejected`. These variants cover the
//! failures that should reach the caller.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    #[error("invalid password flow: {0}")]
    InvalidFlow(String),
}

/// Result alias for token endpoint operations.
pub type Result<T> = std::result::Result<T, Error>;
