//! Product records and their identity
//!
//! A [`Record`] is produced once per content item per view visit. Identity for
//! deduplication comes from [`fingerprint`], and the [`SeenSetRegistry`] tracks
//! which fingerprints were already emitted in the current navigation scope.

pub mod filter;
pub mod fingerprint;
pub mod normalize;
pub mod seen_set;

pub use filter::RecordFilter;
pub use fingerprint::{Fingerprint, fingerprint, fingerprint_parts};
pub use normalize::{normalize_records, price_value, review_count, validate_records};
pub use seen_set::SeenSetRegistry;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the segments of a category path (`"Computers > Laptops"`)
pub const CATEGORY_PATH_SEPARATOR: &str = " > ";

/// Join category names from the root into a display path
#[must_use]
pub fn join_category_path(segments: &[String]) -> String {
    segments.join(CATEGORY_PATH_SEPARATOR)
}

/// Review count as read from the listing
///
/// Most sources render `"14 reviews"`, which normalizes to a count. Text that
/// carries no leading number is kept verbatim instead of being forced to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReviewCount {
    Count(u32),
    Raw(String),
}

impl Default for ReviewCount {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl fmt::Display for ReviewCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Raw(text) => f.write_str(text),
        }
    }
}

/// One extracted product listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub price: String,
    /// Numeric price parsed from `price`; `None` when the text has no number
    #[serde(default)]
    pub price_value: Option<f64>,
    pub description: String,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub stars: u32,
    #[serde(default)]
    pub review_count: ReviewCount,
    #[serde(default)]
    pub url: Option<String>,
    /// Set by the category walker; empty when collected from the root view
    #[serde(default)]
    pub category_path: String,
}

impl Record {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        price: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Tag the record with the category path it was collected under
    #[must_use]
    pub fn tagged(mut self, category_path: &str) -> Self {
        self.category_path = category_path.to_string();
        self
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint(self)
    }
}
