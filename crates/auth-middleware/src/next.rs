//! The downstream half of the middleware chain
//!
//! `Next` is "send this request and return its response". The interceptor
//! calls it once per request, twice when it retries after a 401. Errors are
//! the transport's own and pass through the interceptor untouched.

use std::future::Future;
use std::pin::Pin;

/// Sends a request to the next handler in the chain.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility (`&dyn Next`).
pub trait Next: Send + Sync {
    fn run(
        &self,
        request: reqwest::Request,
    ) -> Pin<Box<dyn Future<Output = reqwest::Result<reqwest::Response>> + Send + '_>>;
}

impl Next for reqwest::Client {
    fn run(
        &self,
        request: reqwest::Request,
    ) -> Pin<Box<dyn Future<Output = reqwest::Result<reqwest::Response>> + Send + '_>> {
        Box::pin(self.execute(request))
    }
}
