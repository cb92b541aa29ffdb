//! Core configuration types for listing collection
//!
//! This module contains the main `HarvestConfig` struct and the enums that
//! select how listing views deliver records and how results are saved.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::selectors::SiteSelectors;
use crate::record::RecordFilter;
use crate::utils::{
    DEFAULT_BASE_URL, DEFAULT_ELEMENT_TIMEOUT_MS, DEFAULT_EXPAND_SETTLE_MS,
    DEFAULT_LOADING_TIMEOUT_MS, DEFAULT_MAX_CATEGORY_DEPTH, DEFAULT_MAX_PAGES,
    DEFAULT_MAX_SCROLLS, DEFAULT_MAX_STAGNANT_ROUNDS, DEFAULT_NAVIGATION_TIMEOUT_MS,
    DEFAULT_OUTPUT_STEM, DEFAULT_PAGE_SETTLE_MS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_RECOVERY_AFTER_STAGNANT_ROUNDS, DEFAULT_SCROLL_SETTLE_MS,
};

/// How a listing view reveals its records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ListingMode {
    /// Discrete numbered pages behind a "next" control
    #[default]
    Pagination,
    /// One page that appends records as the viewport reaches the bottom
    Scroll,
}

/// Which files the session writes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Both,
}

/// Main configuration for a collection session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Entry view; reloaded whenever the walker backtracks
    pub(crate) base_url: String,
    pub(crate) output_dir: PathBuf,
    pub(crate) output_stem: String,
    pub(crate) output_format: OutputFormat,
    /// Gzip the JSON output (`.json.gz`)
    pub(crate) compress_output: bool,
    pub(crate) headless: bool,
    pub(crate) listing_mode: ListingMode,

    /// Ceiling on pages visited per paginated view
    pub(crate) max_pages: u32,
    /// Ceiling on scroll rounds per infinite-scroll view
    pub(crate) max_scrolls: u32,
    pub(crate) scroll_settle_ms: u64,
    pub(crate) max_stagnant_rounds: u32,
    /// Stagnant rounds before the one top-then-bottom recovery maneuver
    pub(crate) recovery_after_stagnant_rounds: u32,
    pub(crate) page_settle_ms: u64,

    /// Bound on the root load and on confirming a page change
    pub(crate) navigation_timeout_ms: u64,
    /// Bound on waiting for listing elements to appear
    pub(crate) element_timeout_ms: u64,
    /// Bound on waiting for the loading indicator to clear
    pub(crate) loading_timeout_ms: u64,
    /// Settle wait after a menu disclosure click
    pub(crate) expand_settle_ms: u64,
    pub(crate) poll_interval_ms: u64,

    /// Category levels walked below the root
    pub(crate) max_category_depth: u8,
    /// Run the final global fingerprint dedup across categories
    pub(crate) cross_category_dedup: bool,

    pub(crate) filter: RecordFilter,
    pub(crate) selectors: SiteSelectors,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("./output"),
            output_stem: DEFAULT_OUTPUT_STEM.to_string(),
            output_format: OutputFormat::default(),
            compress_output: false,
            headless: true,
            listing_mode: ListingMode::default(),
            max_pages: DEFAULT_MAX_PAGES,
            max_scrolls: DEFAULT_MAX_SCROLLS,
            scroll_settle_ms: DEFAULT_SCROLL_SETTLE_MS,
            max_stagnant_rounds: DEFAULT_MAX_STAGNANT_ROUNDS,
            recovery_after_stagnant_rounds: DEFAULT_RECOVERY_AFTER_STAGNANT_ROUNDS,
            page_settle_ms: DEFAULT_PAGE_SETTLE_MS,
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            element_timeout_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            loading_timeout_ms: DEFAULT_LOADING_TIMEOUT_MS,
            expand_settle_ms: DEFAULT_EXPAND_SETTLE_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_category_depth: DEFAULT_MAX_CATEGORY_DEPTH,
            cross_category_dedup: true,
            filter: RecordFilter::default(),
            selectors: SiteSelectors::default(),
        }
    }
}
