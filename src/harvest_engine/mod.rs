//! Harvest Engine Module
//!
//! Cursors that drain one listing view, the termination policy they share,
//! the category walker that visits every view, and the session that ties a
//! walk to persistence.

// Sub-modules
pub mod cursor;
pub mod harvest_types;
pub mod navigation;
pub mod pagination;
pub mod progress;
pub mod scroll;
pub mod session;
pub mod termination;
pub mod walker;

// Re-exports for public API
pub use cursor::ViewCursor;
pub use harvest_types::{
    CursorStatus, EmitStats, HarvestError, HarvestResult, SessionReport, SkippedCategory,
    StopReason, ViewHarvest, ViewSummary,
};
pub use navigation::CategoryMenu;
pub use pagination::{Advance, PageState, PaginationCursor};
pub use progress::{HarvestProgress, LogProgress, NoOpProgress};
pub use scroll::{ScrollCursor, ScrollState};
pub use session::{CollectionSession, dedup_records, retry_with_backoff};
pub use termination::{PageEvidence, ScrollEvidence, TerminationPolicy, Verdict};
pub use walker::{CategoryWalker, WalkOutcome};
