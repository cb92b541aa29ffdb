//! Core types shared across the collection engine
//!
//! Error type for unexpected failures, plus the value types cursors and the
//! walker use to report how a view ended.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::dom::DomError;
use crate::record::Record;

/// Unexpected failures that end a collection session
///
/// Expected conditions (missing elements, end of content, unconfirmed
/// navigation) never surface here; they are values on the cursor and walker
/// results.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HarvestError {
    /// The rendering collaborator cannot be reached
    #[error("Source unreachable: {0}")]
    Unreachable(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Persistence failed: {0}")]
    Persistence(String),
}

impl From<DomError> for HarvestError {
    fn from(err: DomError) -> Self {
        if err.is_fatal() {
            Self::Unreachable(err.to_string())
        } else {
            Self::Browser(err.to_string())
        }
    }
}

/// Convenience alias for Result with `HarvestError`
pub type HarvestResult<T> = Result<T, HarvestError>;

/// Terminal state of a cursor; both stop collection for the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorStatus {
    /// No further content is obtainable: ceiling reached or no next page
    Exhausted,
    /// Content stopped arriving, or an end marker appeared
    Stalled,
}

/// Why a cursor stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Too many consecutive unproductive scroll rounds
    Stagnant,
    /// An end-of-content marker is visible
    EndMarker,
    ScrollCeiling,
    PageCeiling,
    /// No visible, enabled "next" affordance
    NoNextPage,
    /// "Next" was clicked but neither location nor page number changed
    NavigationUnconfirmed,
}

impl StopReason {
    #[must_use]
    pub const fn status(self) -> CursorStatus {
        match self {
            Self::Stagnant | Self::EndMarker => CursorStatus::Stalled,
            Self::ScrollCeiling
            | Self::PageCeiling
            | Self::NoNextPage
            | Self::NavigationUnconfirmed => CursorStatus::Exhausted,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Stagnant => "record count stagnant",
            Self::EndMarker => "end-of-content marker visible",
            Self::ScrollCeiling => "scroll ceiling reached",
            Self::PageCeiling => "page ceiling reached",
            Self::NoNextPage => "no next page",
            Self::NavigationUnconfirmed => "navigation unconfirmed",
        };
        f.write_str(text)
    }
}

/// Per-view extraction counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmitStats {
    /// Items handed to the extraction adapter
    pub extracted: usize,
    pub emitted: usize,
    /// Rejected by the seen-set
    pub duplicates: usize,
    /// No title
    pub unusable: usize,
    /// Emitted with one or more fields defaulted
    pub partial: usize,
}

impl std::ops::AddAssign for EmitStats {
    fn add_assign(&mut self, other: Self) {
        self.extracted += other.extracted;
        self.emitted += other.emitted;
        self.duplicates += other.duplicates;
        self.unusable += other.unusable;
        self.partial += other.partial;
    }
}

/// Everything a cursor collected from one view
#[derive(Debug, Clone)]
pub struct ViewHarvest {
    pub records: Vec<Record>,
    pub reason: StopReason,
    /// Pages visited or scroll rounds performed
    pub rounds: u32,
    pub stats: EmitStats,
}

impl ViewHarvest {
    #[must_use]
    pub fn status(&self) -> CursorStatus {
        self.reason.status()
    }
}

/// Diagnostic summary of one visited view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSummary {
    pub category_path: String,
    pub status: CursorStatus,
    pub reason: StopReason,
    pub rounds: u32,
    pub stats: EmitStats,
}

impl ViewSummary {
    #[must_use]
    pub fn new(category_path: &str, view: &ViewHarvest) -> Self {
        Self {
            category_path: category_path.to_string(),
            status: view.status(),
            reason: view.reason,
            rounds: view.rounds,
            stats: view.stats,
        }
    }
}

/// A category the walker could not enter or collect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCategory {
    pub category_path: String,
    pub reason: String,
}

/// Result of a complete collection session
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub records: Vec<Record>,
    pub views: Vec<ViewSummary>,
    pub skipped: Vec<SkippedCategory>,
    /// Removed by the final cross-view dedup pass
    pub duplicates_dropped: usize,
    /// Removed for lacking a title
    pub invalid_dropped: usize,
    /// Removed by the configured record filter
    pub filtered_out: usize,
    /// What the persistence collaborator reported
    pub saved: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
