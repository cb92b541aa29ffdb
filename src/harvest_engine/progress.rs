//! Progress reporting abstraction for collection sessions
//!
//! Defines the `HarvestProgress` trait for lifecycle event reporting and
//! provides a no-op implementation plus one that writes to the log.

use log::{info, warn};

use super::harvest_types::{SessionReport, ViewSummary};

/// Trait for reporting collection progress at key lifecycle events
///
/// Implementations can send updates to channels, log to console, update UI, etc.
pub trait HarvestProgress: Send + Sync {
    /// The root listing is about to be loaded
    fn session_started(&self, base_url: &str);

    /// The walker cleared the seen-set for a new view
    fn scope_reset(&self, category_path: &str);

    /// Navigation into a category was confirmed
    fn category_entered(&self, category_path: &str);

    /// A cursor finished a view
    fn view_finished(&self, summary: &ViewSummary);

    /// A category could not be entered or collected
    fn category_skipped(&self, category_path: &str, reason: &str);

    /// The final dedup pass removed `dropped` records
    fn deduplicated(&self, dropped: usize);

    /// The persistence collaborator was handed `count` records
    fn saved(&self, count: usize, saved: bool);

    fn completed(&self, report: &SessionReport);
}

/// Progress reporter that does nothing
///
/// All methods are no-ops and will be inlined away by the compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl HarvestProgress for NoOpProgress {
    #[inline(always)]
    fn session_started(&self, _base_url: &str) {}

    #[inline(always)]
    fn scope_reset(&self, _category_path: &str) {}

    #[inline(always)]
    fn category_entered(&self, _category_path: &str) {}

    #[inline(always)]
    fn view_finished(&self, _summary: &ViewSummary) {}

    #[inline(always)]
    fn category_skipped(&self, _category_path: &str, _reason: &str) {}

    #[inline(always)]
    fn deduplicated(&self, _dropped: usize) {}

    #[inline(always)]
    fn saved(&self, _count: usize, _saved: bool) {}

    #[inline(always)]
    fn completed(&self, _report: &SessionReport) {}
}

/// Progress reporter used by the command line: one log line per event
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl HarvestProgress for LogProgress {
    fn session_started(&self, base_url: &str) {
        info!("Starting collection at {base_url}");
    }

    fn scope_reset(&self, _category_path: &str) {}

    fn category_entered(&self, category_path: &str) {
        info!("Processing category: {category_path}");
    }

    fn view_finished(&self, summary: &ViewSummary) {
        let label = if summary.category_path.is_empty() {
            "listing"
        } else {
            summary.category_path.as_str()
        };
        info!(
            "Found {} products in {label} ({} rounds, {})",
            summary.stats.emitted, summary.rounds, summary.reason
        );
    }

    fn category_skipped(&self, _category_path: &str, _reason: &str) {}

    fn deduplicated(&self, dropped: usize) {
        if dropped > 0 {
            info!("Removed {dropped} duplicate products");
        }
    }

    fn saved(&self, count: usize, saved: bool) {
        if saved {
            info!("Saved {count} products");
        } else {
            warn!("No products to save");
        }
    }

    fn completed(&self, report: &SessionReport) {
        let elapsed = report.finished_at - report.started_at;
        info!(
            "Collection finished: {} products from {} views in {}s ({} skipped)",
            report.records.len(),
            report.views.len(),
            elapsed.num_seconds(),
            report.skipped.len()
        );
    }
}
