//! Post-collection record filtering by price range and star rating

use serde::{Deserialize, Serialize};

use super::Record;

/// Optional bounds applied to the collected records before saving
///
/// A record without a parsed price value fails any price bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordFilter {
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub min_stars: Option<u32>,
}

impl RecordFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_price.is_none() && self.max_price.is_none() && self.min_stars.is_none()
    }

    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        if self.min_price.is_some() || self.max_price.is_some() {
            let Some(price) = record.price_value else {
                return false;
            };
            if self.min_price.is_some_and(|min| price < min) {
                return false;
            }
            if self.max_price.is_some_and(|max| price > max) {
                return false;
            }
        }
        self.min_stars.is_none_or(|min| record.stars >= min)
    }

    /// Keep matching records; returns them with the number removed
    #[must_use]
    pub fn apply(&self, records: Vec<Record>) -> (Vec<Record>, usize) {
        if self.is_empty() {
            return (records, 0);
        }
        let total = records.len();
        let kept: Vec<Record> = records.into_iter().filter(|r| self.matches(r)).collect();
        let removed = total - kept.len();
        log::info!("Filter kept {} of {total} records", kept.len());
        (kept, removed)
    }
}
