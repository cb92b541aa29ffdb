//! Depth-first category traversal
//!
//! Each category view gets a fresh seen-set scope before it is entered. After a
//! subcategory is finished the walker reloads the base listing and re-enters
//! the parent, so every sibling starts from the same menu state.

use std::future::Future;
use std::pin::Pin;

use log::{debug, info, warn};

use super::cursor::ViewCursor;
use super::harvest_types::{
    HarvestError, HarvestResult, SkippedCategory, ViewHarvest, ViewSummary,
};
use super::navigation::CategoryMenu;
use super::progress::HarvestProgress;
use crate::config::HarvestConfig;
use crate::dom::{DomDriver, DomError, with_page_timeout};
use crate::record::{Record, SeenSetRegistry, join_category_path};

/// Everything gathered by one walk
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// Records in collection order, already tagged with their category path
    pub records: Vec<Record>,
    pub views: Vec<ViewSummary>,
    pub skipped: Vec<SkippedCategory>,
}

pub struct CategoryWalker<'a, P: HarvestProgress + ?Sized> {
    config: &'a HarvestConfig,
    cursor: ViewCursor<'a>,
    menu: CategoryMenu<'a>,
    progress: &'a P,
}

impl<'a, P: HarvestProgress + ?Sized> CategoryWalker<'a, P> {
    pub fn new(config: &'a HarvestConfig, progress: &'a P) -> Self {
        Self {
            config,
            cursor: ViewCursor::for_config(config),
            menu: CategoryMenu::new(config),
            progress,
        }
    }

    /// Visit every reachable category below the currently loaded root
    ///
    /// A site without a category menu is collected as a single view with an
    /// empty category path.
    ///
    /// # Errors
    ///
    /// Only when the browser becomes unreachable. Categories that fail in any
    /// other way are skipped and listed in the outcome.
    pub async fn walk<D: DomDriver>(
        &self,
        driver: &D,
        seen: &mut SeenSetRegistry,
    ) -> HarvestResult<WalkOutcome> {
        let mut outcome = WalkOutcome::default();
        let roots = self.menu.top_level_names(driver).await.map_err(escalate)?;

        if roots.is_empty() {
            info!("No categories found, collecting the listing as a single view");
            seen.enter_scope("");
            self.progress.scope_reset("");
            let view = self.cursor.collect(driver, seen, "").await.map_err(escalate)?;
            self.record_view("", view, &mut outcome);
            return Ok(outcome);
        }

        for name in roots {
            self.visit(driver, seen, vec![name], &mut outcome).await?;
        }
        Ok(outcome)
    }

    /// Enter `path`, collect it, then recurse into its subcategories
    fn visit<'b, D: DomDriver>(
        &'b self,
        driver: &'b D,
        seen: &'b mut SeenSetRegistry,
        path: Vec<String>,
        outcome: &'b mut WalkOutcome,
    ) -> Pin<Box<dyn Future<Output = HarvestResult<()>> + Send + 'b>>
    where
        'a: 'b,
    {
        Box::pin(async move {
            let label = join_category_path(&path);
            seen.enter_scope(&label);
            self.progress.scope_reset(&label);

            match self.menu.enter(driver, &path).await {
                Ok(true) => self.progress.category_entered(&label),
                Ok(false) => {
                    self.skip(&label, "navigation was not confirmed", outcome);
                    return Ok(());
                }
                Err(e) => return self.skip_or_escalate(&label, e, outcome),
            }

            match self.cursor.collect(driver, seen, &label).await {
                Ok(view) => self.record_view(&label, view, outcome),
                Err(e) => return self.skip_or_escalate(&label, e, outcome),
            }

            if path.len() >= usize::from(self.config.max_category_depth()) {
                return Ok(());
            }
            let children = match self.children(driver, &path).await {
                Ok(children) => children,
                Err(e) if e.is_fatal() => return Err(escalate(e)),
                Err(e) => {
                    debug!("Could not list subcategories of {label}: {e}");
                    Vec::new()
                }
            };

            for child in children {
                let mut child_path = path.clone();
                child_path.push(child);
                self.visit(driver, seen, child_path, outcome).await?;

                if let Err(e) = self.return_to(driver, &path).await {
                    if e.is_fatal() {
                        return Err(escalate(e));
                    }
                    warn!("Could not return to {label}: {e}");
                }
            }
            Ok(())
        })
    }

    async fn children<D: DomDriver>(
        &self,
        driver: &D,
        path: &[String],
    ) -> Result<Vec<String>, DomError> {
        if !self.menu.expand(driver, path).await? {
            return Ok(Vec::new());
        }
        let Some(parent) = path.last() else {
            return Ok(Vec::new());
        };
        self.menu.child_names(driver, parent).await
    }

    /// Reload the base listing and re-enter `path`
    async fn return_to<D: DomDriver>(&self, driver: &D, path: &[String]) -> Result<(), DomError> {
        with_page_timeout(
            driver.open(self.config.base_url()),
            self.config.navigation_timeout(),
            "reload base listing",
        )
        .await?;
        if !self.menu.navigate_to(driver, path).await? {
            warn!("Re-entering {} was not confirmed", join_category_path(path));
        }
        Ok(())
    }

    fn record_view(&self, label: &str, view: ViewHarvest, outcome: &mut WalkOutcome) {
        let summary = ViewSummary::new(label, &view);
        self.progress.view_finished(&summary);
        outcome.views.push(summary);
        outcome.records.extend(view.records);
    }

    fn skip(&self, label: &str, reason: &str, outcome: &mut WalkOutcome) {
        warn!("Skipping category {label}: {reason}");
        self.progress.category_skipped(label, reason);
        outcome.skipped.push(SkippedCategory {
            category_path: label.to_string(),
            reason: reason.to_string(),
        });
    }

    fn skip_or_escalate(
        &self,
        label: &str,
        error: DomError,
        outcome: &mut WalkOutcome,
    ) -> HarvestResult<()> {
        if error.is_fatal() {
            return Err(escalate(error));
        }
        self.skip(label, &error.to_string(), outcome);
        Ok(())
    }
}

fn escalate(error: DomError) -> HarvestError {
    HarvestError::from(error)
}
