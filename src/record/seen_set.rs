//! Scoped registry of emitted fingerprints
//!
//! One registry is owned by the collection session and handed to each walker
//! step by `&mut`. The walker resets it whenever it enters a different category
//! node, so the same product listed under two categories is emitted in both
//! scopes; cross-scope duplicates are handled by the session's final pass.

use std::collections::HashSet;

use super::{Fingerprint, Record, fingerprint};

#[derive(Debug, Default)]
pub struct SeenSetRegistry {
    seen: HashSet<Fingerprint>,
    scope: String,
    resets: u64,
}

impl SeenSetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the scope, keeping its label
    pub fn reset(&mut self) {
        self.seen.clear();
        self.resets += 1;
    }

    /// Clear the scope and relabel it for diagnostics
    pub fn enter_scope(&mut self, label: &str) {
        self.reset();
        self.scope.clear();
        self.scope.push_str(label);
    }

    /// Record the fingerprint and return `true` if the record is novel in this
    /// scope; return `false` for a duplicate.
    pub fn try_emit(&mut self, record: &Record) -> bool {
        self.seen.insert(fingerprint(record))
    }

    #[must_use]
    pub fn contains(&self, record: &Record) -> bool {
        self.seen.contains(&fingerprint(record))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Number of resets since creation
    #[must_use]
    pub fn resets(&self) -> u64 {
        self.resets
    }
}
