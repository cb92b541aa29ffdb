use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use super::RecordSink;
use super::compression::{OutputMetadata, save_output_file};
use crate::record::{Record, ReviewCount};

/// Flat CSV shape of a [`Record`]; every column is text so rows compare exactly
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
struct CsvRow {
    title: String,
    price: String,
    price_value: String,
    description: String,
    rating: String,
    stars: u32,
    review_count: String,
    url: String,
    category: String,
}

impl From<&Record> for CsvRow {
    fn from(record: &Record) -> Self {
        Self {
            title: record.title.clone(),
            price: record.price.clone(),
            price_value: record
                .price_value
                .map(|v| v.to_string())
                .unwrap_or_default(),
            description: record.description.clone(),
            rating: record.rating.clone().unwrap_or_default(),
            stars: record.stars,
            review_count: record.review_count.to_string(),
            url: record.url.clone().unwrap_or_default(),
            category: record.category_path.clone(),
        }
    }
}

impl From<CsvRow> for Record {
    fn from(row: CsvRow) -> Self {
        let review_count = row
            .review_count
            .parse()
            .map_or(ReviewCount::Raw(row.review_count), ReviewCount::Count);
        Self {
            price_value: row.price_value.parse().ok(),
            title: row.title,
            price: row.price,
            description: row.description,
            rating: Some(row.rating).filter(|r| !r.is_empty()),
            stars: row.stars,
            review_count,
            url: Some(row.url).filter(|u| !u.is_empty()),
            category_path: row.category,
        }
    }
}

/// Writes records as CSV with every field quoted
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSink for CsvSink {
    async fn save(&self, records: &[Record]) -> Result<bool> {
        if records.is_empty() {
            log::warn!("No data to save");
            return Ok(false);
        }

        let mut unique = HashSet::with_capacity(records.len());
        let rows: Vec<CsvRow> = records
            .iter()
            .map(CsvRow::from)
            .filter(|row| unique.insert(row.clone()))
            .collect();
        if rows.len() < records.len() {
            log::info!("Removed {} duplicate products", records.len() - rows.len());
        }

        log_category_counts(&rows);

        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(Vec::new());
        for row in &rows {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV buffer: {}", e.error()))?;

        let metadata = OutputMetadata::new(rows.len(), "text/csv");
        let written = save_output_file(bytes, &self.path, &metadata, false).await?;
        log::info!("Saved {} products to {}", rows.len(), written.display());
        Ok(true)
    }
}

fn log_category_counts(rows: &[CsvRow]) {
    if rows.iter().all(|row| row.category.is_empty()) {
        return;
    }
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.category.as_str()).or_default() += 1;
    }
    log::info!("Products by category:");
    for (category, count) in counts {
        log::info!("  - {category}: {count} products");
    }
}

/// Read records back from a file written by [`CsvSink`]
pub fn load_records_csv(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut records = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        records.push(Record::from(row?));
    }
    Ok(records)
}
