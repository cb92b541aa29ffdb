//! Shared stop decision for both cursor kinds
//!
//! Pure functions over evidence gathered by a cursor. Thresholds come from the
//! config; keeping the decision here means the pagination and scroll cursors
//! cannot drift apart on when a view is done.

use super::harvest_types::StopReason;
use crate::config::HarvestConfig;

/// What a scroll round observed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollEvidence {
    /// Rounds performed so far, including this one
    pub round: u32,
    pub height_delta: i64,
    pub record_delta: i64,
    pub consecutive_stagnant_rounds: u32,
    /// The recovery maneuver already ran in this stagnation streak
    pub recovery_attempted: bool,
    pub end_marker_visible: bool,
}

/// What a paginated view shows after its records were read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEvidence {
    pub page_number: u32,
    pub next_available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    /// Run the top-then-bottom recovery maneuver, then assess again
    Recover,
    Stop(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationPolicy {
    max_pages: u32,
    max_scrolls: u32,
    max_stagnant_rounds: u32,
    recovery_after: u32,
}

impl TerminationPolicy {
    #[must_use]
    pub const fn new(
        max_pages: u32,
        max_scrolls: u32,
        max_stagnant_rounds: u32,
        recovery_after: u32,
    ) -> Self {
        Self {
            max_pages,
            max_scrolls,
            max_stagnant_rounds,
            recovery_after,
        }
    }

    #[must_use]
    pub fn from_config(config: &HarvestConfig) -> Self {
        Self::new(
            config.max_pages(),
            config.max_scrolls(),
            config.max_stagnant_rounds(),
            config.recovery_after_stagnant_rounds(),
        )
    }

    /// Decide the next step after a scroll round
    ///
    /// An end marker stops at once. Otherwise the recovery maneuver runs once
    /// when the stagnation streak reaches its threshold, before stagnation or
    /// the round ceiling can stop the view. Height growth alone never counts as
    /// progress.
    #[must_use]
    pub fn assess_scroll(&self, evidence: &ScrollEvidence) -> Verdict {
        if evidence.end_marker_visible {
            return Verdict::Stop(StopReason::EndMarker);
        }
        if evidence.record_delta <= 0
            && !evidence.recovery_attempted
            && evidence.consecutive_stagnant_rounds == self.recovery_after
        {
            return Verdict::Recover;
        }
        if evidence.consecutive_stagnant_rounds >= self.max_stagnant_rounds {
            return Verdict::Stop(StopReason::Stagnant);
        }
        if evidence.round >= self.max_scrolls {
            return Verdict::Stop(StopReason::ScrollCeiling);
        }
        Verdict::Continue
    }

    /// Decide whether a paginated view may advance past `page_number`
    #[must_use]
    pub fn assess_page(&self, evidence: &PageEvidence) -> Verdict {
        if evidence.page_number >= self.max_pages {
            return Verdict::Stop(StopReason::PageCeiling);
        }
        if !evidence.next_available {
            return Verdict::Stop(StopReason::NoNextPage);
        }
        Verdict::Continue
    }

    /// Whether the scroll evidence ends the view (recovery is not an end)
    #[must_use]
    pub fn is_exhausted(&self, evidence: &ScrollEvidence) -> bool {
        matches!(self.assess_scroll(evidence), Verdict::Stop(_))
    }

    #[must_use]
    pub const fn max_pages(&self) -> u32 {
        self.max_pages
    }

    #[must_use]
    pub const fn max_scrolls(&self) -> u32 {
        self.max_scrolls
    }
}
