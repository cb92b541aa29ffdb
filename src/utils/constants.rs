//! Shared configuration constants for shelfwalk
//!
//! Default values used by the config builder and the collection engine, kept
//! in one place to avoid magic numbers.

/// Default ceiling on pages visited per paginated view
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Default ceiling on scroll rounds per infinite-scroll view
pub const DEFAULT_MAX_SCROLLS: u32 = 50;

/// Default settle wait after each scroll-to-bottom: 2.5 seconds
///
/// Lazy loaders on the observed sources need around two seconds to append a
/// batch; shorter waits produce false stagnant rounds.
pub const DEFAULT_SCROLL_SETTLE_MS: u64 = 2_500;

/// Default number of consecutive unproductive scroll rounds before a view is
/// declared stalled
pub const DEFAULT_MAX_STAGNANT_ROUNDS: u32 = 5;

/// Consecutive stagnant rounds after which the scroll cursor performs its one
/// top-then-bottom recovery maneuver
pub const DEFAULT_RECOVERY_AFTER_STAGNANT_ROUNDS: u32 = 3;

/// Default settle wait after forcing a paginated view to its scrolled state
pub const DEFAULT_PAGE_SETTLE_MS: u64 = 1_000;

/// Default bound on navigation confirmation and root loads: 10 seconds
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 10_000;

/// Default bound on waiting for elements to appear: 10 seconds
pub const DEFAULT_ELEMENT_TIMEOUT_MS: u64 = 10_000;

/// Default bound on waiting for a loading indicator to clear
pub const DEFAULT_LOADING_TIMEOUT_MS: u64 = 5_000;

/// Default settle wait after a menu disclosure click
pub const DEFAULT_EXPAND_SETTLE_MS: u64 = 1_000;

/// Polling interval for every bounded wait: 500ms
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Category depth walked below the root: category and subcategory
pub const DEFAULT_MAX_CATEGORY_DEPTH: u8 = 2;

/// Characters of the description that take part in a record fingerprint
pub const DESCRIPTION_PREFIX_CHARS: usize = 50;

/// Retry attempts for the initial root load on transient failures
pub const ROOT_LOAD_RETRIES: u32 = 2;

/// Default output file stem (`scraped_products.csv`, `scraped_products.json`)
pub const DEFAULT_OUTPUT_STEM: &str = "scraped_products";

/// Default entry point: the all-in-one paginated test shop
pub const DEFAULT_BASE_URL: &str = "https://webscraper.io/test-sites/e-commerce/allinone";
