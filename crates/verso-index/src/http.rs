//! Shared HTTP client construction for the search service.

use std::time::Duration;

/// Request timeout used when the configuration does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Create an HTTP client with verso's standard configuration.
///
/// Config: 10s connect timeout, `timeout_secs` request timeout, rustls TLS,
/// `verso/{version}` user-agent, redirect limit 10.
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialized (should never happen with rustls).
#[must_use]
pub fn default_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(concat!("verso/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .expect("default HTTP client construction must not fail")
}
