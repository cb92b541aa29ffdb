pub mod browser_setup;
pub mod config;
pub mod content_saver;
pub mod dom;
pub mod harvest_engine;
pub mod item_extractor;
pub mod logging;
pub mod record;
pub mod utils;

pub use browser_setup::{BrowserSession, download_managed_browser, find_browser_executable};
pub use config::{HarvestConfig, ListingMode, OutputFormat, SiteSelectors};
pub use content_saver::{
    CsvSink, JsonSink, MultiSink, RecordSink, load_records_csv, sink_for_config,
};
pub use dom::{ChromiumDriver, DomDriver, DomError, DomResult, ElementPath, PollSettings};
pub use harvest_engine::{
    CategoryWalker, CollectionSession, CursorStatus, HarvestError, HarvestProgress,
    HarvestResult, LogProgress, NoOpProgress, SessionReport, StopReason, TerminationPolicy,
    ViewCursor, ViewSummary,
};
pub use item_extractor::{Extraction, Field, ItemExtractor};
pub use record::{Fingerprint, Record, RecordFilter, ReviewCount, SeenSetRegistry, fingerprint};
