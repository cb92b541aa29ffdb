//! Builder methods available for all states
//!
//! This module contains methods that can be called on the builder
//! regardless of its current type state.

use std::marker::PhantomData;

use super::builder::{HarvestConfigBuilder, WithBaseUrl};
use super::selectors::SiteSelectors;
use super::types::{HarvestConfig, ListingMode, OutputFormat};
use crate::record::RecordFilter;

impl HarvestConfig {
    /// Reopen a finished config for overrides, e.g. CLI flags on top of a file
    #[must_use]
    pub fn into_builder(self) -> HarvestConfigBuilder<WithBaseUrl> {
        HarvestConfigBuilder {
            output_dir: Some(self.output_dir.clone()),
            base_url: Some(self.base_url.clone()),
            draft: self,
            _phantom: PhantomData,
        }
    }
}

impl<State> HarvestConfigBuilder<State> {
    /// Run the browser without a window (default `true`)
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.draft.headless = headless;
        self
    }

    #[must_use]
    pub fn listing_mode(mut self, mode: ListingMode) -> Self {
        self.draft.listing_mode = mode;
        self
    }

    #[must_use]
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.draft.max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn max_scrolls(mut self, max_scrolls: u32) -> Self {
        self.draft.max_scrolls = max_scrolls;
        self
    }

    #[must_use]
    pub fn scroll_settle_ms(mut self, ms: u64) -> Self {
        self.draft.scroll_settle_ms = ms;
        self
    }

    #[must_use]
    pub fn max_stagnant_rounds(mut self, rounds: u32) -> Self {
        self.draft.max_stagnant_rounds = rounds;
        self
    }

    /// Stagnant rounds after which the scroll cursor scrolls to the top and
    /// back down once
    #[must_use]
    pub fn recovery_after_stagnant_rounds(mut self, rounds: u32) -> Self {
        self.draft.recovery_after_stagnant_rounds = rounds;
        self
    }

    #[must_use]
    pub fn page_settle_ms(mut self, ms: u64) -> Self {
        self.draft.page_settle_ms = ms;
        self
    }

    #[must_use]
    pub fn navigation_timeout_ms(mut self, ms: u64) -> Self {
        self.draft.navigation_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn element_timeout_ms(mut self, ms: u64) -> Self {
        self.draft.element_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn loading_timeout_ms(mut self, ms: u64) -> Self {
        self.draft.loading_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn expand_settle_ms(mut self, ms: u64) -> Self {
        self.draft.expand_settle_ms = ms;
        self
    }

    #[must_use]
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.draft.poll_interval_ms = ms;
        self
    }

    #[must_use]
    pub fn max_category_depth(mut self, depth: u8) -> Self {
        self.draft.max_category_depth = depth;
        self
    }

    /// Keep or disable the final cross-category fingerprint dedup
    ///
    /// Enabled by default. The global pass drops distinct products that share
    /// title, price and description prefix across categories.
    #[must_use]
    pub fn cross_category_dedup(mut self, enabled: bool) -> Self {
        self.draft.cross_category_dedup = enabled;
        self
    }

    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.draft.output_format = format;
        self
    }

    #[must_use]
    pub fn output_stem(mut self, stem: impl Into<String>) -> Self {
        self.draft.output_stem = stem.into();
        self
    }

    #[must_use]
    pub fn compress_output(mut self, compress: bool) -> Self {
        self.draft.compress_output = compress;
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: RecordFilter) -> Self {
        self.draft.filter = filter;
        self
    }

    #[must_use]
    pub fn selectors(mut self, selectors: SiteSelectors) -> Self {
        self.draft.selectors = selectors;
        self
    }
}
