//! Shared HTTP client construction.

use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

use crate::error::Result;

/// Build a client that retries transient failures with exponential backoff.
pub fn build_http_client(timeout: Duration) -> Result<ClientWithMiddleware> {
    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_millis(100), Duration::from_secs(5))
        .build_with_max_retries(3);

    let client = reqwest::Client::builder().timeout(timeout).build()?;

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Client without retries; the default for the provider constructors.
pub fn plain_http_client() -> ClientWithMiddleware {
    ClientBuilder::new(reqwest::Client::new()).build()
}
