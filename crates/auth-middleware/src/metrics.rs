//! Token exchange and retry counters
//!
//! - `auth_token_exchanges_total` (counter): labels `grant`, `outcome`
//! - `auth_retries_total` (counter): label `outcome`
//!
//! Without an installed recorder these calls are no-ops.

/// Grant type label values.
pub const GRANT_REFRESH: &str = "refresh";
pub const GRANT_PASSWORD: &str = "password";

/// Record the outcome of one token endpoint call.
///
/// `outcome` is one of `granted`, `rejected`, `error`.
pub fn record_exchange(grant: &'static str, outcome: &'static str) {
    metrics::counter!("auth_token_exchanges_total", "grant" => grant, "outcome" => outcome)
        .increment(1);
}

/// Record whether a 401 with fresh tokens led to a retry (`sent`) or not
/// (`skipped`, the request body could not be cloned).
pub fn record_retry(outcome: &'static str) {
    metrics::counter!("auth_retries_total", "outcome" => outcome).increment(1);
}
