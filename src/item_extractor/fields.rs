use std::fmt;

use crate::record::Record;

/// A record field that the adapter may fail to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Price,
    Description,
    Rating,
    ReviewCount,
    Url,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Price => "price",
            Self::Description => "description",
            Self::Rating => "rating",
            Self::ReviewCount => "review_count",
            Self::Url => "url",
        };
        f.write_str(name)
    }
}

/// Outcome of extracting one product card
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Complete(Record),
    /// Some fields could not be read and hold their defaults
    Partial { record: Record, gaps: Vec<Field> },
    /// No title; the card cannot be identified
    Unusable,
}

impl Extraction {
    #[must_use]
    pub fn into_record(self) -> Option<Record> {
        match self {
            Self::Complete(record) | Self::Partial { record, .. } => Some(record),
            Self::Unusable => None,
        }
    }

    #[must_use]
    pub fn gaps(&self) -> &[Field] {
        match self {
            Self::Partial { gaps, .. } => gaps,
            Self::Complete(_) | Self::Unusable => &[],
        }
    }
}
