//! Persistence collaborators for collected records

// Module declarations
mod compression;
mod csv_saver;
mod json_saver;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{HarvestConfig, OutputFormat};
use crate::record::Record;

// Re-export public API from compression module
pub use compression::{OutputMetadata, save_output_file};

// Re-export public API from the saver modules
pub use csv_saver::{CsvSink, load_records_csv};
pub use json_saver::JsonSink;

/// Destination for the final record set of a session
///
/// Returns `Ok(false)` when there was nothing to persist.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn save(&self, records: &[Record]) -> Result<bool>;
}

/// Fans one record set out to several sinks
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn RecordSink>>,
}

impl MultiSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, sink: impl RecordSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl RecordSink for MultiSink {
    /// True if any sink persisted something; the first failure aborts
    async fn save(&self, records: &[Record]) -> Result<bool> {
        let mut saved = false;
        for sink in &self.sinks {
            saved |= sink.save(records).await?;
        }
        Ok(saved)
    }
}

/// Sinks for the configured output format under the configured directory
#[must_use]
pub fn sink_for_config(config: &HarvestConfig) -> MultiSink {
    let csv = || CsvSink::new(config.output_path("csv"));
    let json = || JsonSink::new(config.output_path("json"), config.compress_output());
    match config.output_format() {
        OutputFormat::Csv => MultiSink::new().with(csv()),
        OutputFormat::Json => MultiSink::new().with(json()),
        OutputFormat::Both => MultiSink::new().with(csv()).with(json()),
    }
}
