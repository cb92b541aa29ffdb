//! Getter methods for `HarvestConfig`
//!
//! Plain accessors plus the derived durations and poll settings the engine
//! consumes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::selectors::SiteSelectors;
use super::types::{HarvestConfig, ListingMode, OutputFormat};
use crate::dom::PollSettings;
use crate::record::RecordFilter;

impl HarvestConfig {
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn output_stem(&self) -> &str {
        &self.output_stem
    }

    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    #[must_use]
    pub fn compress_output(&self) -> bool {
        self.compress_output
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn listing_mode(&self) -> ListingMode {
        self.listing_mode
    }

    #[must_use]
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    #[must_use]
    pub fn max_scrolls(&self) -> u32 {
        self.max_scrolls
    }

    #[must_use]
    pub fn max_stagnant_rounds(&self) -> u32 {
        self.max_stagnant_rounds
    }

    #[must_use]
    pub fn recovery_after_stagnant_rounds(&self) -> u32 {
        self.recovery_after_stagnant_rounds
    }

    #[must_use]
    pub fn max_category_depth(&self) -> u8 {
        self.max_category_depth
    }

    #[must_use]
    pub fn cross_category_dedup(&self) -> bool {
        self.cross_category_dedup
    }

    #[must_use]
    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    #[must_use]
    pub fn selectors(&self) -> &SiteSelectors {
        &self.selectors
    }

    #[must_use]
    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    #[must_use]
    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    #[must_use]
    pub fn expand_settle(&self) -> Duration {
        Duration::from_millis(self.expand_settle_ms)
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Waiting for listing elements to appear
    #[must_use]
    pub fn element_poll(&self) -> PollSettings {
        PollSettings::from_millis(self.poll_interval_ms, self.element_timeout_ms)
    }

    /// Confirming a page change or a menu disclosure
    #[must_use]
    pub fn navigation_poll(&self) -> PollSettings {
        PollSettings::from_millis(self.poll_interval_ms, self.navigation_timeout_ms)
    }

    /// Waiting for the loading indicator to clear
    #[must_use]
    pub fn loading_poll(&self) -> PollSettings {
        PollSettings::from_millis(self.poll_interval_ms, self.loading_timeout_ms)
    }

    /// Path of an output file with the given extension
    #[must_use]
    pub fn output_path(&self, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{extension}", self.output_stem))
    }
}
