//! Cursor selection and the extraction loop both cursor kinds share

use log::trace;

use super::harvest_types::{EmitStats, ViewHarvest};
use super::pagination::PaginationCursor;
use super::scroll::ScrollCursor;
use crate::config::{HarvestConfig, ListingMode};
use crate::dom::{DomDriver, DomResult};
use crate::item_extractor::ItemExtractor;
use crate::record::{Record, SeenSetRegistry};

/// The listing strategy for one view, chosen from the configured mode
#[derive(Debug, Clone, Copy)]
pub enum ViewCursor<'a> {
    Pagination(PaginationCursor<'a>),
    Scroll(ScrollCursor<'a>),
}

impl<'a> ViewCursor<'a> {
    #[must_use]
    pub fn for_config(config: &'a HarvestConfig) -> Self {
        match config.listing_mode() {
            ListingMode::Pagination => Self::Pagination(PaginationCursor::new(config)),
            ListingMode::Scroll => Self::Scroll(ScrollCursor::new(config)),
        }
    }

    /// Collect every record the current view yields, tagged with `category_path`
    ///
    /// # Errors
    ///
    /// Only fatal collaborator errors; every expected end of content is a
    /// [`StopReason`](super::StopReason) on the result.
    pub async fn collect<D: DomDriver>(
        &self,
        driver: &D,
        seen: &mut SeenSetRegistry,
        category_path: &str,
    ) -> DomResult<ViewHarvest> {
        match self {
            Self::Pagination(cursor) => cursor.collect(driver, seen, category_path).await,
            Self::Scroll(cursor) => cursor.collect(driver, seen, category_path).await,
        }
    }
}

/// Extract `items` in order, admitting each record through the seen-set
pub(crate) async fn emit_items<D: DomDriver>(
    driver: &D,
    extractor: &ItemExtractor<'_>,
    items: &[D::Handle],
    seen: &mut SeenSetRegistry,
    category_path: &str,
    out: &mut Vec<Record>,
) -> DomResult<EmitStats> {
    let mut stats = EmitStats::default();
    for item in items {
        stats.extracted += 1;
        let extraction = extractor.extract(driver, item).await?;
        if !extraction.gaps().is_empty() {
            stats.partial += 1;
        }
        let Some(record) = extraction.into_record() else {
            stats.unusable += 1;
            continue;
        };
        if seen.try_emit(&record) {
            out.push(record.tagged(category_path));
            stats.emitted += 1;
        } else {
            trace!("Already seen: {}", record.title);
            stats.duplicates += 1;
        }
    }
    Ok(stats)
}
