use anyhow::Result;
use flate2::{Compression, GzBuilder};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::time::timeout;

/// Timeout for blocking compression and file I/O
const BLOCKING_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Metadata stored in the gzip comment field of compressed output
///
/// Derived only from the content, so the same records always compress to the
/// same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputMetadata {
    pub records: usize,
    pub content_type: String,
}

impl OutputMetadata {
    #[must_use]
    pub fn new(records: usize, content_type: &str) -> Self {
        Self {
            records,
            content_type: content_type.to_string(),
        }
    }
}

/// Write `content` to `path` atomically, optionally gzip-compressed
///
/// When `compress` is set the file is written as `<path>.gz` with `metadata`
/// in the gzip comment. The parent directory is created if needed. Returns the
/// path actually written.
///
/// All compression and file I/O runs on the blocking pool.
pub async fn save_output_file(
    content: Vec<u8>,
    path: &Path,
    metadata: &OutputMetadata,
    compress: bool,
) -> Result<PathBuf> {
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    tokio::fs::create_dir_all(&parent_dir).await?;

    let target = if compress {
        path.with_extension(format!(
            "{}.gz",
            path.extension().unwrap_or_default().to_str().unwrap_or("")
        ))
    } else {
        path.to_path_buf()
    };

    let comment = if compress {
        Some(serde_json::to_string(metadata)?)
    } else {
        None
    };
    let filename = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Missing filename"))?
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid filename encoding"))?
        .to_string();

    let target_for_task = target.clone();
    let content_len = content.len();
    let blocking_task = tokio::task::spawn_blocking(move || -> Result<()> {
        // Temp file in the target directory so the rename stays on one filesystem
        let mut temp_file = NamedTempFile::new_in(&parent_dir)?;
        match comment {
            Some(comment) => {
                let mut gz = GzBuilder::new()
                    .filename(filename)
                    .comment(comment)
                    .write(temp_file, Compression::new(3));
                gz.write_all(&content)?;
                temp_file = gz.finish()?;
            }
            None => temp_file.write_all(&content)?,
        }
        temp_file.persist(&target_for_task)?;
        Ok(())
    });

    match timeout(BLOCKING_WRITE_TIMEOUT, blocking_task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(e)) => return Err(anyhow::anyhow!("Blocking write task panicked: {}", e)),
        Err(_) => {
            log::warn!(
                "Blocking write timeout for file: {:?} (size: {} bytes, timeout: {:?})",
                target,
                content_len,
                BLOCKING_WRITE_TIMEOUT
            );
            return Err(anyhow::anyhow!(
                "Write timed out after {:?} - possible filesystem hang or extremely slow disk",
                BLOCKING_WRITE_TIMEOUT
            ));
        }
    }

    Ok(target)
}
