//! Bounded polling over the DOM collaborator
//!
//! Every wait in the engine goes through here. A wait samples the page at a
//! fixed interval until its condition holds or the timeout elapses, and then
//! answers with a plain value: `None`, an empty list, or `false`. Collaborator
//! errors still propagate so the caller can tell "absent" from "broken".

use log::trace;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

use super::{DomDriver, DomResult};

/// Interval and bound for one kind of wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollSettings {
    #[must_use]
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    #[must_use]
    pub fn from_millis(interval_ms: u64, timeout_ms: u64) -> Self {
        Self::new(
            Duration::from_millis(interval_ms),
            Duration::from_millis(timeout_ms),
        )
    }

    /// Same interval, different bound
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }
}

/// Poll `probe` until it yields `Some` or the timeout elapses
///
/// The probe always runs at least once, so a zero timeout is an immediate check.
pub async fn poll_for<T, F, Fut>(settings: PollSettings, mut probe: F) -> DomResult<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DomResult<Option<T>>>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = probe().await? {
            return Ok(Some(value));
        }

        let elapsed = start.elapsed();
        if elapsed >= settings.timeout {
            trace!("Poll gave up after {elapsed:?}");
            return Ok(None);
        }

        sleep(settings.interval.min(settings.timeout - elapsed)).await;
    }
}

/// Poll until `condition` holds; `false` when the timeout elapses first
pub async fn wait_until<F, Fut>(settings: PollSettings, mut condition: F) -> DomResult<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DomResult<bool>>,
{
    let outcome = poll_for(settings, || {
        let check = condition();
        async move { Ok(check.await?.then_some(())) }
    })
    .await?;
    Ok(outcome.is_some())
}

/// First element matching `selector`, waiting up to the timeout
pub async fn locate<D: DomDriver>(
    driver: &D,
    selector: &str,
    settings: PollSettings,
) -> DomResult<Option<D::Handle>> {
    poll_for(settings, || async move {
        Ok(driver.query_all(selector).await?.into_iter().next())
    })
    .await
}

/// All elements matching `selector` once at least one exists; empty when none
/// appeared before the timeout
pub async fn locate_all<D: DomDriver>(
    driver: &D,
    selector: &str,
    settings: PollSettings,
) -> DomResult<Vec<D::Handle>> {
    let found = poll_for(settings, || async move {
        let handles = driver.query_all(selector).await?;
        Ok((!handles.is_empty()).then_some(handles))
    })
    .await?;
    Ok(found.unwrap_or_default())
}

/// First element matching `selector` inside `parent`. Never waits.
pub async fn first_within<D: DomDriver>(
    driver: &D,
    parent: &D::Handle,
    selector: &str,
) -> DomResult<Option<D::Handle>> {
    Ok(driver.query_within(parent, selector).await?.into_iter().next())
}

/// Whether any element matching `selector` is currently visible. Never waits.
pub async fn any_visible<D: DomDriver>(driver: &D, selector: &str) -> DomResult<bool> {
    for handle in driver.query_all(selector).await? {
        if driver.is_visible(&handle).await? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Wait for every element matching `selector` to be hidden or gone
///
/// Returns `false` if something matching is still visible at the timeout.
pub async fn wait_for_clear<D: DomDriver>(
    driver: &D,
    selector: &str,
    settings: PollSettings,
) -> DomResult<bool> {
    wait_until(settings, || async move { Ok(!any_visible(driver, selector).await?) }).await
}

/// Fixed settle wait letting asynchronous rendering catch up
pub async fn settle(duration: Duration) {
    if !duration.is_zero() {
        sleep(duration).await;
    }
}
