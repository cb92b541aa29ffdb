//! Field-level value normalization
//!
//! Pure text parsing applied after collection: numeric prices, review counts,
//! and dropping records that carry no title.

use log::{info, warn};
use regex::Regex;
use std::sync::LazyLock;

use super::{Record, ReviewCount};

static PRICE_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\d.\-]").expect("PRICE_NOISE: hardcoded regex is valid")
});

static REVIEWS_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*reviews?").expect("REVIEWS_PHRASE: hardcoded regex is valid")
});

/// Parse the numeric value of a price string such as `"$1,234.56"`
///
/// Returns `None` when no digits remain after stripping currency symbols and
/// separators, or when more than one decimal point is left.
#[must_use]
pub fn price_value(price: &str) -> Option<f64> {
    let numeric = PRICE_NOISE.replace_all(price, "");
    if !numeric.chars().any(|c| c.is_ascii_digit()) {
        if !price.trim().is_empty() {
            warn!("Could not extract a price value from {price:?}");
        }
        return None;
    }
    if numeric.matches('.').count() > 1 {
        warn!("Invalid price format (multiple decimal points): {price:?}");
        return None;
    }
    numeric.parse::<f64>().ok()
}

/// Parse review text such as `"14 reviews"` into a count
#[must_use]
pub fn review_count(text: &str) -> ReviewCount {
    let text = text.trim();
    if let Some(count) = REVIEWS_PHRASE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
    {
        return ReviewCount::Count(count);
    }

    match text.split_whitespace().next() {
        Some(token) => token
            .parse::<u32>()
            .map_or_else(|_| ReviewCount::Raw(text.to_string()), ReviewCount::Count),
        None => ReviewCount::Count(0),
    }
}

/// Split records into those with a usable title and the count of dropped ones
#[must_use]
pub fn validate_records(records: Vec<Record>) -> (Vec<Record>, usize) {
    let total = records.len();
    let valid: Vec<Record> = records
        .into_iter()
        .filter(|record| !record.title.trim().is_empty())
        .collect();
    let dropped = total - valid.len();
    if dropped > 0 {
        warn!("Dropped {dropped} records without a title");
    }
    info!("Data validation: {} valid items out of {total}", valid.len());
    (valid, dropped)
}

/// Fill derived fields: price value, and review count when only the rating
/// text carries it
pub fn normalize_records(records: &mut [Record]) {
    for record in records.iter_mut() {
        if record.price_value.is_none() {
            record.price_value = price_value(&record.price);
        }
        if record.review_count == ReviewCount::Count(0)
            && let Some(rating) = record.rating.as_deref()
            && let ReviewCount::Count(n) = review_count(rating)
        {
            record.review_count = ReviewCount::Count(n);
        }
    }
}
