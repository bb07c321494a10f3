//! Timeout utilities for page operations
//!
//! Bounds DOM reads so a wedged tab cannot stall the crawl loop.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Run `operation` with an upper bound of `timeout`.
///
/// Distinguishes between the operation failing and the timeout elapsing
/// in the returned error.
pub async fn with_page_timeout<F, T>(operation: F, timeout: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!("{operation_name} timeout after {timeout:?}")),
    }
}
