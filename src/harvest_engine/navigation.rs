//! Category menu operations: listing, entering and expanding categories
//!
//! Links are always looked up again by their visible name right before use.
//! Nothing found in the menu survives a navigation.

use log::{debug, trace};

use crate::config::{HarvestConfig, SiteSelectors};
use crate::dom::polling::{first_within, locate_all, settle, wait_until};
use crate::dom::{DomDriver, DomResult};
use crate::utils::collapse_whitespace;

#[derive(Debug, Clone, Copy)]
pub struct CategoryMenu<'a> {
    config: &'a HarvestConfig,
}

impl<'a> CategoryMenu<'a> {
    #[must_use]
    pub fn new(config: &'a HarvestConfig) -> Self {
        Self { config }
    }

    fn selectors(&self) -> &'a SiteSelectors {
        self.config.selectors()
    }

    /// Names of the top-level categories in menu order, skipped names removed
    pub async fn top_level_names<D: DomDriver>(&self, driver: &D) -> DomResult<Vec<String>> {
        let links =
            locate_all(driver, &self.selectors().category_links, self.config.element_poll())
                .await?;
        let mut names = Vec::with_capacity(links.len());
        for link in &links {
            if let Some(name) = link_name(driver, link).await?
                && !self.selectors().is_skipped_category(&name)
                && !names.contains(&name)
            {
                names.push(name);
            }
        }
        debug!("Found {} categories", names.len());
        Ok(names)
    }

    /// Subcategory names shown under the expanded entry for `parent`
    pub async fn child_names<D: DomDriver>(&self, driver: &D, parent: &str) -> DomResult<Vec<String>> {
        let Some(entry) = self.expanded_entry(driver, parent).await? else {
            return Ok(Vec::new());
        };
        let mut names = Vec::new();
        for link in driver
            .query_within(&entry, &self.selectors().submenu_links)
            .await?
        {
            if let Some(name) = link_name(driver, &link).await?
                && !self.selectors().is_skipped_category(&name)
                && !names.contains(&name)
            {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// The open menu entry whose header reads `name`
    pub async fn expanded_entry<D: DomDriver>(
        &self,
        driver: &D,
        name: &str,
    ) -> DomResult<Option<D::Handle>> {
        for entry in driver.query_all(&self.selectors().expanded_menu).await? {
            let Some(header) = first_within(driver, &entry, &self.selectors().menu_header_link).await?
            else {
                continue;
            };
            if link_name(driver, &header).await?.as_deref() == Some(name) {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Make sure the submenu of `path`'s last category is disclosed
    ///
    /// Does nothing when it already is. Returns whether it is open afterwards.
    pub async fn expand<D: DomDriver>(&self, driver: &D, path: &[String]) -> DomResult<bool> {
        let Some(name) = path.last() else {
            return Ok(false);
        };
        if self.expanded_entry(driver, name).await?.is_some() {
            trace!("{name} is already expanded");
            return Ok(true);
        }
        let Some(link) = self.find_link(driver, path).await? else {
            return Ok(false);
        };
        self.click_link(driver, &link).await?;
        settle(self.config.expand_settle()).await;
        wait_until(self.config.navigation_poll(), || async move {
            Ok(self.expanded_entry(driver, name).await?.is_some())
        })
        .await
    }

    /// Click the menu link for the last category of `path`
    ///
    /// The view must already show that category's link: the top-level menu for
    /// a top-level category, or the parent's disclosed submenu otherwise.
    /// Returns whether the move was confirmed.
    pub async fn enter<D: DomDriver>(&self, driver: &D, path: &[String]) -> DomResult<bool> {
        if path.len() > 1 && !self.expand(driver, &path[..path.len() - 1]).await? {
            debug!("Parent of {path:?} could not be expanded");
            return Ok(false);
        }
        let Some(link) = self.find_link(driver, path).await? else {
            debug!("No menu link for {path:?}");
            return Ok(false);
        };
        let Some(name) = path.last() else {
            return Ok(false);
        };

        let location_before = driver.current_location().await?;
        self.click_link(driver, &link).await?;
        let moved = wait_until(self.config.navigation_poll(), || {
            let location_before = location_before.as_str();
            async move {
                Ok(driver.current_location().await? != location_before
                    || self.expanded_entry(driver, name).await?.is_some())
            }
        })
        .await?;
        if moved {
            settle(self.config.page_settle()).await;
        }
        Ok(moved)
    }

    /// Enter every category along `path` starting from the root menu
    pub async fn navigate_to<D: DomDriver>(&self, driver: &D, path: &[String]) -> DomResult<bool> {
        for depth in 1..=path.len() {
            if !self.enter(driver, &path[..depth]).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn find_link<D: DomDriver>(
        &self,
        driver: &D,
        path: &[String],
    ) -> DomResult<Option<D::Handle>> {
        let (name, parent) = match path {
            [] => return Ok(None),
            [name] => (name, None),
            [.., parent, name] => (name, Some(parent)),
        };
        let candidates = match parent {
            None => driver.query_all(&self.selectors().category_links).await?,
            Some(parent) => match self.expanded_entry(driver, parent).await? {
                Some(entry) => {
                    driver
                        .query_within(&entry, &self.selectors().submenu_links)
                        .await?
                }
                None => return Ok(None),
            },
        };
        for link in candidates {
            if link_name(driver, &link).await?.as_deref() == Some(name.as_str()) {
                return Ok(Some(link));
            }
        }
        Ok(None)
    }

    /// Bring the link into view and click it, falling back to a script click
    async fn click_link<D: DomDriver>(&self, driver: &D, link: &D::Handle) -> DomResult<()> {
        if let Err(e) = driver.scroll_into_view(link).await {
            if e.is_fatal() {
                return Err(e);
            }
            trace!("Could not scroll menu link into view: {e}");
        }
        match driver.click(link).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                debug!("Native click failed ({e}), using script click");
                driver.js_click(link).await
            }
        }
    }
}

async fn link_name<D: DomDriver>(driver: &D, link: &D::Handle) -> DomResult<Option<String>> {
    Ok(driver
        .text(link)
        .await?
        .map(|t| collapse_whitespace(&t))
        .filter(|t| !t.is_empty()))
}
