//! Timeout utilities for page operations
//!
//! Wraps browser operations in `tokio::time::timeout` so navigation and
//! protocol calls cannot hang a collection session.

use std::future::Future;
use std::time::Duration;

use super::{DomError, DomResult};

/// Run a page operation with an explicit timeout
///
/// # Returns
/// * `Ok(T)` - Operation completed successfully
/// * `Err(DomError::Timeout)` - The timeout was reached
/// * `Err(_)` - The operation itself failed
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> DomResult<T>
where
    F: Future<Output = DomResult<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(DomError::Timeout {
            operation: operation_name.to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
