//! Scroll cursor: incremental traversal of an infinite-scroll listing
//!
//! Each round scrolls to the bottom, waits for rendering, and compares the
//! visible card count with the previous round. Only cards past the previous
//! count are handed to the extraction adapter. Document height is recorded for
//! diagnostics but is never treated as progress on its own.

use log::{debug, info, trace};

use super::cursor::emit_items;
use super::harvest_types::{EmitStats, StopReason, ViewHarvest};
use super::termination::{ScrollEvidence, TerminationPolicy, Verdict};
use crate::config::{HarvestConfig, SiteSelectors};
use crate::dom::polling::{any_visible, locate_all, settle, wait_for_clear};
use crate::dom::{DomDriver, DomResult};
use crate::item_extractor::ItemExtractor;
use crate::record::SeenSetRegistry;

/// Counters carried between rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub scroll_count: u32,
    pub consecutive_stagnant_rounds: u32,
    pub last_height: i64,
    pub last_count: usize,
}

/// One observation of the listing after rendering settled
struct Sample<H> {
    height: i64,
    items: Vec<H>,
}

#[derive(Debug, Clone, Copy)]
pub struct ScrollCursor<'a> {
    config: &'a HarvestConfig,
    policy: TerminationPolicy,
}

impl<'a> ScrollCursor<'a> {
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

    /// Scroll until the policy stops the view
    pub async fn collect<D: DomDriver>(
        &self,
        driver: &D,
        seen: &mut SeenSetRegistry,
        category_path: &str,
    ) -> DomResult<ViewHarvest> {
        let extractor = ItemExtractor::new(self.selectors());
        let mut records = Vec::new();
        let mut stats = EmitStats::default();

        let initial =
            locate_all(driver, &self.selectors().product_container, self.config.element_poll())
                .await?;
        stats += emit_items(driver, &extractor, &initial, seen, category_path, &mut records).await?;

        let mut state = ScrollState {
            last_height: driver.document_height().await?,
            last_count: initial.len(),
            ..ScrollState::default()
        };
        debug!("Initial product count: {}", state.last_count);

        let reason = loop {
            let mut sample = self.scroll_round(driver).await?;
            state.scroll_count += 1;

            let mut record_delta = count_delta(sample.items.len(), state.last_count);
            if record_delta > 0 {
                stats += emit_items(
                    driver,
                    &extractor,
                    &sample.items[state.last_count..],
                    seen,
                    category_path,
                    &mut records,
                )
                .await?;
                state.last_count = sample.items.len();
                state.consecutive_stagnant_rounds = 0;
            } else {
                state.consecutive_stagnant_rounds += 1;
            }

            let mut evidence = ScrollEvidence {
                round: state.scroll_count,
                height_delta: sample.height - state.last_height,
                record_delta,
                consecutive_stagnant_rounds: state.consecutive_stagnant_rounds,
                recovery_attempted: false,
                end_marker_visible: self.end_marker_visible(driver).await?,
            };
            let mut verdict = self.policy.assess_scroll(&evidence);

            if verdict == Verdict::Recover {
                debug!(
                    "No new products for {} rounds, scrolling to top and back",
                    state.consecutive_stagnant_rounds
                );
                sample = self.recover(driver).await?;
                record_delta = count_delta(sample.items.len(), state.last_count);
                if record_delta > 0 {
                    stats += emit_items(
                        driver,
                        &extractor,
                        &sample.items[state.last_count..],
                        seen,
                        category_path,
                        &mut records,
                    )
                    .await?;
                    state.last_count = sample.items.len();
                    state.consecutive_stagnant_rounds = 0;
                }
                evidence = ScrollEvidence {
                    height_delta: sample.height - state.last_height,
                    record_delta,
                    consecutive_stagnant_rounds: state.consecutive_stagnant_rounds,
                    recovery_attempted: true,
                    end_marker_visible: self.end_marker_visible(driver).await?,
                    ..evidence
                };
                verdict = self.policy.assess_scroll(&evidence);
            }

            trace!(
                "Scroll {}: {} products, height delta {}, stagnant {}, exhausted {}",
                state.scroll_count,
                state.last_count,
                evidence.height_delta,
                state.consecutive_stagnant_rounds,
                self.policy.is_exhausted(&evidence)
            );
            state.last_height = sample.height;

            if let Verdict::Stop(reason) = verdict {
                break reason;
            }
        };

        info!(
            "Scrolling ended after {} rounds with {} products: {reason}",
            state.scroll_count, state.last_count
        );
        Ok(ViewHarvest {
            records,
            reason,
            rounds: state.scroll_count,
            stats,
        })
    }

    async fn scroll_round<D: DomDriver>(&self, driver: &D) -> DomResult<Sample<D::Handle>> {
        driver.scroll_to_bottom().await?;
        settle(self.config.scroll_settle()).await;
        self.wait_for_loading(driver).await?;
        self.sample(driver).await
    }

    /// Top, then bottom again; nudges listings that only load on a fresh
    /// scroll event
    async fn recover<D: DomDriver>(&self, driver: &D) -> DomResult<Sample<D::Handle>> {
        driver.scroll_to_top().await?;
        settle(self.config.scroll_settle()).await;
        driver.scroll_to_bottom().await?;
        settle(self.config.scroll_settle()).await;
        self.wait_for_loading(driver).await?;
        self.sample(driver).await
    }

    async fn wait_for_loading<D: DomDriver>(&self, driver: &D) -> DomResult<()> {
        if !wait_for_clear(driver, &self.selectors().loading_indicator, self.config.loading_poll())
            .await?
        {
            debug!("Loading indicator did not clear");
        }
        Ok(())
    }

    async fn sample<D: DomDriver>(&self, driver: &D) -> DomResult<Sample<D::Handle>> {
        Ok(Sample {
            height: driver.document_height().await?,
            items: driver.query_all(&self.selectors().product_container).await?,
        })
    }

    async fn end_marker_visible<D: DomDriver>(&self, driver: &D) -> DomResult<bool> {
        for marker in &self.selectors().end_markers {
            if any_visible(driver, marker).await? {
                debug!("End of results marker visible: {marker}");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn count_delta(now: usize, before: usize) -> i64 {
    i64::try_from(now).unwrap_or(i64::MAX) - i64::try_from(before).unwrap_or(i64::MAX)
}
