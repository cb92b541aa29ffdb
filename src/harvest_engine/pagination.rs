//! Pagination cursor: page-by-page traversal through a "next" control
//!
//! A page is only counted as visited after navigation to it has been
//! confirmed, either by a changed location or by a higher active page number.
//! A click that changes neither ends the view instead of re-reading the same
//! page forever.

use log::{debug, info, trace, warn};

use super::cursor::emit_items;
use super::harvest_types::{EmitStats, StopReason, ViewHarvest};
use super::termination::{PageEvidence, TerminationPolicy, Verdict};
use crate::config::{HarvestConfig, SiteSelectors};
use crate::dom::polling::{locate_all, settle, wait_for_clear, wait_until};
use crate::dom::{DomDriver, DomResult};
use crate::item_extractor::ItemExtractor;
use crate::record::SeenSetRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    OnPage(u32),
    Exhausted(StopReason),
}

/// Result of trying to move to the next page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    NoNextAffordance,
    /// Clicked, but neither location nor page indicator changed in time
    Unconfirmed,
}

#[derive(Debug, Clone, Copy)]
pub struct PaginationCursor<'a> {
    config: &'a HarvestConfig,
    policy: TerminationPolicy,
}

impl<'a> PaginationCursor<'a> {
    #[must_use]
    pub fn new(config: &'a HarvestConfig) -> Self {
        Self {
            config,
            policy: TerminationPolicy::from_config(config),
        }
    }

    fn selectors(&self) -> &'a SiteSelectors {
        self.config.selectors()
    }

    /// Walk pages from the current one until no next page can be confirmed
    pub async fn collect<D: DomDriver>(
        &self,
        driver: &D,
        seen: &mut SeenSetRegistry,
        category_path: &str,
    ) -> DomResult<ViewHarvest> {
        let extractor = ItemExtractor::new(self.selectors());
        let mut records = Vec::new();
        let mut stats = EmitStats::default();
        let mut pages_visited = 0;
        let mut state = PageState::OnPage(1);

        let reason = loop {
            let page_number = match state {
                PageState::OnPage(n) => n,
                PageState::Exhausted(reason) => break reason,
            };
            trace!("Collecting page {page_number} of {category_path:?}");

            self.prepare_page(driver).await?;
            let items =
                locate_all(driver, &self.selectors().product_container, self.config.element_poll())
                    .await?;
            if items.is_empty() {
                debug!("No products found on page {page_number}");
            }
            stats += emit_items(driver, &extractor, &items, seen, category_path, &mut records).await?;
            pages_visited += 1;

            let next = self.find_next(driver).await?;
            let evidence = PageEvidence {
                page_number,
                next_available: next.is_some(),
            };
            state = match (self.policy.assess_page(&evidence), next) {
                (Verdict::Stop(reason), _) => PageState::Exhausted(reason),
                (_, None) => PageState::Exhausted(StopReason::NoNextPage),
                (_, Some(next)) => match self.advance(driver, &next).await? {
                    Advance::Moved => PageState::OnPage(page_number + 1),
                    Advance::NoNextAffordance => PageState::Exhausted(StopReason::NoNextPage),
                    Advance::Unconfirmed => {
                        warn!("Next page click on page {page_number} was not confirmed");
                        PageState::Exhausted(StopReason::NavigationUnconfirmed)
                    }
                },
            };
        };

        info!("Pagination ended after {pages_visited} pages: {reason}");
        Ok(ViewHarvest {
            records,
            reason,
            rounds: pages_visited,
            stats,
        })
    }

    /// Bring lazily rendered cards into view and let them settle
    async fn prepare_page<D: DomDriver>(&self, driver: &D) -> DomResult<()> {
        driver.scroll_to_bottom().await?;
        settle(self.config.page_settle()).await;
        if !wait_for_clear(driver, &self.selectors().loading_indicator, self.config.loading_poll())
            .await?
        {
            debug!("Loading indicator still visible, reading page anyway");
        }
        Ok(())
    }

    /// The visible, enabled "next" control, if the page has one
    pub async fn find_next<D: DomDriver>(&self, driver: &D) -> DomResult<Option<D::Handle>> {
        let sel = self.selectors();

        for marker in driver.query_all(&sel.disabled_next).await? {
            if driver
                .text(&marker)
                .await?
                .is_some_and(|t| t.contains(sel.next_page_text.as_str()))
            {
                trace!("Next control is disabled");
                return Ok(None);
            }
        }

        let location = driver.current_location().await?;
        for link in driver.query_all(&sel.pagination_links).await? {
            let is_next_text = driver
                .text(&link)
                .await?
                .is_some_and(|t| t.contains(sel.next_page_text.as_str()));
            let is_next_rel = driver
                .attribute(&link, "rel")
                .await?
                .is_some_and(|rel| rel.eq_ignore_ascii_case("next"));
            if !is_next_text && !is_next_rel {
                continue;
            }
            if !driver.is_visible(&link).await? || is_disabled(driver, &link).await? {
                continue;
            }
            if let Some(href) = driver.attribute(&link, "href").await?
                && points_at(&location, &href)
            {
                trace!("Next control points at the current page");
                continue;
            }
            return Ok(Some(link));
        }
        Ok(None)
    }

    /// Click `next` and confirm that the view moved
    pub async fn advance<D: DomDriver>(&self, driver: &D, next: &D::Handle) -> DomResult<Advance> {
        let location_before = driver.current_location().await?;
        let page_before = self.active_page_number(driver).await?;

        if let Err(e) = driver.click(next).await {
            if e.is_fatal() {
                return Err(e);
            }
            debug!("Native click on next failed ({e}), trying script click");
            if let Err(e) = driver.js_click(next).await {
                if e.is_fatal() {
                    return Err(e);
                }
                debug!("Script click on next failed: {e}");
                return Ok(Advance::NoNextAffordance);
            }
        }

        let moved = wait_until(self.config.navigation_poll(), || {
            let location_before = location_before.as_str();
            async move {
                if driver.current_location().await? != location_before {
                    return Ok(true);
                }
                Ok(self.active_page_number(driver).await? > page_before)
            }
        })
        .await?;

        Ok(if moved {
            Advance::Moved
        } else {
            Advance::Unconfirmed
        })
    }

    /// Number shown by the active page indicator; 1 when there is none
    pub async fn active_page_number<D: DomDriver>(&self, driver: &D) -> DomResult<u32> {
        let Some(active) = driver
            .query_all(&self.selectors().active_page)
            .await?
            .into_iter()
            .next()
        else {
            return Ok(1);
        };
        Ok(driver
            .text(&active)
            .await?
            .and_then(|t| leading_number(&t))
            .unwrap_or(1))
    }
}

async fn is_disabled<D: DomDriver>(driver: &D, link: &D::Handle) -> DomResult<bool> {
    if driver.attribute(link, "disabled").await?.is_some() {
        return Ok(true);
    }
    if driver
        .attribute(link, "aria-disabled")
        .await?
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    {
        return Ok(true);
    }
    Ok(driver
        .attribute(link, "class")
        .await?
        .is_some_and(|class| class.split_whitespace().any(|c| c == "disabled")))
}

/// Whether `href`, resolved against `location`, is `location` itself
fn points_at(location: &str, href: &str) -> bool {
    match url::Url::parse(location).and_then(|base| base.join(href)) {
        Ok(target) => target.as_str() == location,
        Err(_) => href == location,
    }
}

fn leading_number(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
