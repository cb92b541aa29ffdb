//! Collection session: one complete run from root load to persistence

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use log::{info, warn};
use rand::Rng;

use super::harvest_types::{HarvestError, HarvestResult, SessionReport};
use super::progress::{HarvestProgress, NoOpProgress};
use super::walker::CategoryWalker;
use crate::config::HarvestConfig;
use crate::content_saver::RecordSink;
use crate::dom::page_helpers::is_retryable;
use crate::dom::{DomDriver, DomResult, with_page_timeout};
use crate::record::{Record, SeenSetRegistry, normalize_records, validate_records};
use crate::utils::ROOT_LOAD_RETRIES;

/// Drives the walker over one DOM collaborator and hands the result to a sink
pub struct CollectionSession<'a, D, S, P: HarvestProgress + ?Sized = NoOpProgress> {
    driver: &'a D,
    sink: &'a S,
    config: &'a HarvestConfig,
    progress: &'a P,
}

impl<'a, D, S> CollectionSession<'a, D, S, NoOpProgress>
where
    D: DomDriver,
    S: RecordSink,
{
    #[must_use]
    pub fn new(driver: &'a D, sink: &'a S, config: &'a HarvestConfig) -> Self {
        Self {
            driver,
            sink,
            config,
            progress: &NoOpProgress,
        }
    }
}

impl<'a, D, S, P> CollectionSession<'a, D, S, P>
where
    D: DomDriver,
    S: RecordSink,
    P: HarvestProgress + ?Sized,
{
    /// Report lifecycle events to `progress`
    #[must_use]
    pub fn with_progress<Q: HarvestProgress + ?Sized>(
        self,
        progress: &'a Q,
    ) -> CollectionSession<'a, D, S, Q> {
        CollectionSession {
            driver: self.driver,
            sink: self.sink,
            config: self.config,
            progress,
        }
    }

    /// Load the root listing, walk every category, and persist the records
    ///
    /// The seen-set lives only for the duration of this call.
    ///
    /// # Errors
    ///
    /// - [`HarvestError::Unreachable`] if the root listing cannot be loaded or
    ///   the browser goes away mid-walk
    /// - [`HarvestError::Persistence`] if the sink fails
    pub async fn run(&self) -> HarvestResult<SessionReport> {
        let started_at = Utc::now();
        let base_url = self.config.base_url();
        self.progress.session_started(base_url);

        retry_with_backoff(
            || {
                with_page_timeout(
                    self.driver.open(base_url),
                    self.config.navigation_timeout(),
                    "load root listing",
                )
            },
            ROOT_LOAD_RETRIES,
        )
        .await
        .map_err(|e| HarvestError::Unreachable(format!("{base_url}: {e}")))?;

        let mut seen = SeenSetRegistry::new();
        let walker = CategoryWalker::new(self.config, self.progress);
        let outcome = walker.walk(self.driver, &mut seen).await?;

        let (mut records, duplicates_dropped) = if self.config.cross_category_dedup() {
            dedup_records(outcome.records)
        } else {
            (outcome.records, 0)
        };
        self.progress.deduplicated(duplicates_dropped);

        normalize_records(&mut records);
        let (records, invalid_dropped) = validate_records(records);
        if invalid_dropped > 0 {
            warn!("Dropped {invalid_dropped} records without a title");
        }
        let (records, filtered_out) = self.config.filter().apply(records);
        if filtered_out > 0 {
            info!("Filter removed {filtered_out} records");
        }

        let saved = self
            .sink
            .save(&records)
            .await
            .map_err(|e| HarvestError::Persistence(format!("{e:#}")))?;
        self.progress.saved(records.len(), saved);

        let report = SessionReport {
            records,
            views: outcome.views,
            skipped: outcome.skipped,
            duplicates_dropped,
            invalid_dropped,
            filtered_out,
            saved,
            started_at,
            finished_at: Utc::now(),
        };
        self.progress.completed(&report);
        Ok(report)
    }
}

/// Keep the first record of each fingerprint, preserving order
#[must_use]
pub fn dedup_records(records: Vec<Record>) -> (Vec<Record>, usize) {
    let before = records.len();
    let mut seen = HashSet::with_capacity(before);
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| seen.insert(record.fingerprint()))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Retry `f` on transient failures with exponential backoff and jitter
pub async fn retry_with_backoff<F, Fut, T>(f: F, max_retries: u32) -> DomResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = DomResult<T>>,
{
    let mut retries = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !is_retryable(&e) {
                    warn!("Non-retryable error encountered, failing fast: {e}");
                    return Err(e);
                }

                if retries >= max_retries {
                    warn!("Max retries ({max_retries}) exceeded: {e}");
                    return Err(e);
                }

                let delay = 2u64.pow(retries) * 1000 + rand::rng().random_range(0..1000);
                warn!(
                    "Retryable error, attempt {}/{max_retries}, retrying in {delay}ms: {e}",
                    retries + 1
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
                retries += 1;
            }
        }
    }
}
