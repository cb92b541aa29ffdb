//! Extraction adapter: one located product card in, one raw record out
//!
//! Field reads are independent. A field that cannot be read leaves its default
//! in the record and is reported as a gap; only a missing title makes the item
//! unusable, because the title is part of the record's identity.

pub mod fields;

pub use fields::{Extraction, Field};

use log::{debug, trace};

use crate::config::SiteSelectors;
use crate::dom::polling::first_within;
use crate::dom::{DomDriver, DomError, DomResult};
use crate::record::{Record, ReviewCount, normalize};
use crate::utils::collapse_whitespace;

/// Maps product cards to records using one site's selectors
#[derive(Debug, Clone, Copy)]
pub struct ItemExtractor<'a> {
    selectors: &'a SiteSelectors,
}

impl<'a> ItemExtractor<'a> {
    #[must_use]
    pub fn new(selectors: &'a SiteSelectors) -> Self {
        Self { selectors }
    }

    /// Read every field of the card at `item`
    ///
    /// # Errors
    ///
    /// Only fatal collaborator errors propagate. Anything else degrades to a
    /// gap or, for the title, to [`Extraction::Unusable`].
    pub async fn extract<D: DomDriver>(&self, driver: &D, item: &D::Handle) -> DomResult<Extraction> {
        let sel = self.selectors;

        let title_handle = tolerate(first_within(driver, item, &sel.title).await, "title")?.flatten();
        let title = match &title_handle {
            Some(handle) => tolerate(driver.text(handle).await, "title text")?
                .flatten()
                .map(|t| collapse_whitespace(&t))
                .filter(|t| !t.is_empty()),
            None => None,
        };
        let (Some(title), Some(title_handle)) = (title, title_handle) else {
            debug!("Skipping product card without a title: {item:?}");
            return Ok(Extraction::Unusable);
        };

        let mut gaps = Vec::new();

        let price = read_text(driver, item, &sel.price).await?;
        if price.is_none() {
            gaps.push(Field::Price);
        }
        let price = price.unwrap_or_default();

        let description = read_text(driver, item, &sel.description).await?;
        if description.is_none() {
            gaps.push(Field::Description);
        }

        let rating = read_text(driver, item, &sel.rating).await?;
        let (review_count, stars) = if rating.is_some() {
            let review_text = read_text(driver, item, &sel.review_count).await?;
            if review_text.is_none() {
                gaps.push(Field::ReviewCount);
            }
            let stars = tolerate(driver.query_within(item, &sel.stars).await, "stars")?
                .map_or(0, |stars| u32::try_from(stars.len()).unwrap_or(u32::MAX));
            (
                review_text.map_or_else(ReviewCount::default, |t| normalize::review_count(&t)),
                stars,
            )
        } else {
            gaps.push(Field::Rating);
            (ReviewCount::default(), 0)
        };

        let url = self.read_url(driver, &title_handle).await?;
        if url.is_none() {
            gaps.push(Field::Url);
        }

        let record = Record {
            price_value: normalize::price_value(&price),
            title,
            price,
            description: description.unwrap_or_default(),
            rating,
            stars,
            review_count,
            url,
            category_path: String::new(),
        };
        trace!("Extracted data for product: {}", record.title);

        if gaps.is_empty() {
            Ok(Extraction::Complete(record))
        } else {
            Ok(Extraction::Partial { record, gaps })
        }
    }

    /// Product link: the title itself when it is an anchor, else the first
    /// anchor inside it
    async fn read_url<D: DomDriver>(&self, driver: &D, title: &D::Handle) -> DomResult<Option<String>> {
        if let Some(href) = tolerate(driver.attribute(title, "href").await, "title href")?.flatten() {
            return Ok(Some(href));
        }
        let Some(link) =
            tolerate(first_within(driver, title, &self.selectors.title_link).await, "title link")?
                .flatten()
        else {
            return Ok(None);
        };
        Ok(tolerate(driver.attribute(&link, "href").await, "link href")?.flatten())
    }
}

/// Trimmed, whitespace-collapsed text of the first match inside `parent`
async fn read_text<D: DomDriver>(
    driver: &D,
    parent: &D::Handle,
    selector: &str,
) -> DomResult<Option<String>> {
    let Some(handle) = tolerate(first_within(driver, parent, selector).await, selector)?.flatten()
    else {
        return Ok(None);
    };
    Ok(tolerate(driver.text(&handle).await, selector)?
        .flatten()
        .map(|t| collapse_whitespace(&t)))
}

/// Turn non-fatal read errors into absence; keep fatal ones
fn tolerate<T>(result: DomResult<T>, what: &str) -> DomResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(e),
        Err(DomError::StaleHandle(path)) => {
            trace!("{what}: stale handle {path}");
            Ok(None)
        }
        Err(e) => {
            debug!("{what}: read failed: {e}");
            Ok(None)
        }
    }
}
