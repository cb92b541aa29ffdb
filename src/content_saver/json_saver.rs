use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::timeout;

use super::RecordSink;
use super::compression::{OutputMetadata, save_output_file};
use crate::record::Record;

/// Timeout for blocking JSON serialization
/// Prevents hangs on pathological data structures
const BLOCKING_SERIALIZATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Writes records as a pretty-printed JSON array
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
    compress: bool,
}

impl JsonSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, compress: bool) -> Self {
        Self {
            path: path.into(),
            compress,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSink for JsonSink {
    async fn save(&self, records: &[Record]) -> Result<bool> {
        if records.is_empty() {
            log::warn!("No data to save");
            return Ok(false);
        }

        let owned = records.to_vec();
        let blocking_task = tokio::task::spawn_blocking(move || serde_json::to_string_pretty(&owned));

        let json_str = match timeout(BLOCKING_SERIALIZATION_TIMEOUT, blocking_task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(e)) => return Err(anyhow::anyhow!("JSON serialization task panicked: {}", e)),
            Err(_) => {
                log::warn!(
                    "JSON serialization timeout (timeout: {:?})",
                    BLOCKING_SERIALIZATION_TIMEOUT
                );
                return Err(anyhow::anyhow!(
                    "JSON serialization timed out after {:?}",
                    BLOCKING_SERIALIZATION_TIMEOUT
                ));
            }
        };

        let metadata = OutputMetadata::new(records.len(), "application/json");
        let written =
            save_output_file(json_str.into_bytes(), &self.path, &metadata, self.compress).await?;
        log::info!("Saved {} products to {}", records.len(), written.display());
        Ok(true)
    }
}
