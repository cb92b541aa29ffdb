//! Test utilities for the shelfwalk test suite
//!
//! `SimulatedSite` is an in-memory listing site implementing `DomDriver`. It
//! answers the default `SiteSelectors` the way the webscraper.io test shops
//! render them and records every navigation in a shared event log.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use shelfwalk::content_saver::RecordSink;
use shelfwalk::dom::{DomDriver, DomError, DomResult};
use shelfwalk::harvest_engine::{HarvestProgress, SessionReport, ViewSummary};
use shelfwalk::record::{Record, join_category_path};
use shelfwalk::{HarvestConfig, ListingMode, SiteSelectors};

#[allow(dead_code)]
pub const BASE_URL: &str = "https://shop.test/catalog";

/// Shared, ordered event log: navigations from the site, scope resets from
/// the progress recorder
pub type EventLog = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub title: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    /// (reviews, stars)
    pub rating: Option<(u32, u32)>,
    pub url: Option<String>,
}

/// A complete product card
#[allow(dead_code)]
pub fn product(title: &str, price: &str) -> Product {
    Product {
        title: Some(title.to_string()),
        price: Some(price.to_string()),
        description: Some(format!("{title} description")),
        rating: Some((3, 4)),
        url: Some(format!("/product/{}", slug(title))),
    }
}

/// `count` complete cards titled `"{prefix} 1"`, `"{prefix} 2"`, ...
#[allow(dead_code)]
pub fn products(prefix: &str, count: usize) -> Vec<Product> {
    (1..=count)
        .map(|i| product(&format!("{prefix} {i}"), &format!("${}.99", 10 + i)))
        .collect()
}

/// How the "next" control of a paginated listing behaves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(dead_code)]
pub enum NextBehavior {
    /// Location gains `?page=n`, next disappears on the last page
    #[default]
    Normal,
    /// Location never changes; only the active page indicator moves
    ClientSide,
    /// Clicking does nothing
    Broken,
    /// Next stays available forever; pages past the end repeat the last one
    Endless,
}

#[derive(Debug, Clone, Default)]
pub struct PagedListing {
    pub pages: Vec<Vec<Product>>,
    pub next: NextBehavior,
}

#[derive(Debug, Clone, Default)]
pub struct ScrollListing {
    /// First batch is rendered on load; each productive scroll reveals one more
    pub batches: Vec<Vec<Product>>,
    /// Once this many batches are shown, bottom scrolls are ignored until the
    /// page has been scrolled to the top once
    pub throttle_after: Option<usize>,
    /// Show an end-of-results marker once every batch is revealed
    pub end_marker: bool,
    /// Document height grows on every scroll even without new cards
    pub height_drift: bool,
}

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Listing {
    Paged(PagedListing),
    Scroll(ScrollListing),
}

impl Default for Listing {
    fn default() -> Self {
        Self::Paged(PagedListing::default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Category {
    pub name: String,
    pub listing: Listing,
    pub children: Vec<Category>,
    /// Clicking the link does nothing
    pub broken: bool,
    /// Clicking the link drops the browser connection
    pub disconnects: bool,
}

#[allow(dead_code)]
impl Category {
    pub fn new(name: &str, listing: Listing) -> Self {
        Self {
            name: name.to_string(),
            listing,
            ..Self::default()
        }
    }

    pub fn with_children(mut self, children: Vec<Category>) -> Self {
        self.children = children;
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    pub fn disconnecting(mut self) -> Self {
        self.disconnects = true;
        self
    }
}

/// Single-page paginated listing
#[allow(dead_code)]
pub fn one_page(items: Vec<Product>) -> Listing {
    Listing::Paged(PagedListing {
        pages: vec![items],
        next: NextBehavior::Normal,
    })
}

#[allow(dead_code)]
pub fn paged(pages: Vec<Vec<Product>>, next: NextBehavior) -> Listing {
    Listing::Paged(PagedListing { pages, next })
}

#[allow(dead_code)]
pub fn scrolling(batches: Vec<Vec<Product>>) -> Listing {
    Listing::Scroll(ScrollListing {
        batches,
        ..ScrollListing::default()
    })
}

#[derive(Debug, Clone, Default)]
pub struct SiteSpec {
    /// Top-level menu; a "Home" link is always rendered first
    pub categories: Vec<Category>,
    /// What the base URL shows
    pub root: Listing,
    /// A loading indicator that never clears
    pub stuck_loading: bool,
    /// Every open() fails as if the browser were gone
    pub unreachable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Title,
    Price,
    Description,
    Rating,
    ReviewCount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLinkKind {
    Number(usize),
    Next,
}

/// Element reference into the simulated document; `generation` goes stale on
/// every navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Product { generation: u64, index: usize },
    Field { generation: u64, index: usize, kind: FieldKind },
    Star { generation: u64 },
    CategoryLink { generation: u64, path: Vec<String> },
    MenuEntry { generation: u64, path: Vec<String> },
    PageLink { generation: u64, kind: PageLinkKind },
    ActivePage { generation: u64 },
    DisabledNext { generation: u64 },
    Loading,
    EndMarker { generation: u64 },
}

impl Node {
    fn generation(&self) -> Option<u64> {
        match self {
            Self::Product { generation, .. }
            | Self::Field { generation, .. }
            | Self::Star { generation }
            | Self::CategoryLink { generation, .. }
            | Self::MenuEntry { generation, .. }
            | Self::PageLink { generation, .. }
            | Self::ActivePage { generation }
            | Self::DisabledNext { generation }
            | Self::EndMarker { generation } => Some(*generation),
            Self::Loading => None,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    location: String,
    view_path: Vec<String>,
    page: usize,
    revealed: usize,
    topped: bool,
    scrolls: u64,
    generation: u64,
    title_reads: Vec<String>,
}

pub struct SimulatedSite {
    spec: SiteSpec,
    selectors: SiteSelectors,
    state: Mutex<State>,
    log: EventLog,
}

#[allow(dead_code)]
impl SimulatedSite {
    pub fn new(spec: SiteSpec) -> Self {
        Self {
            spec,
            selectors: SiteSelectors::default(),
            state: Mutex::new(State {
                location: "about:blank".to_string(),
                ..State::default()
            }),
            log: EventLog::default(),
        }
    }

    /// Site that already shows `listing` at the base URL, with no menu
    pub fn loaded(listing: Listing) -> Self {
        let site = Self::new(SiteSpec {
            root: listing,
            ..SiteSpec::default()
        });
        site.go_to(BASE_URL, Vec::new());
        site.log.lock().expect("log lock").clear();
        site
    }

    pub fn log(&self) -> EventLog {
        self.log.clone()
    }

    pub fn events(&self) -> Vec<String> {
        self.log.lock().expect("log lock").clone()
    }

    /// Titles handed to the extractor, in read order
    pub fn title_reads(&self) -> Vec<String> {
        self.state.lock().expect("state lock").title_reads.clone()
    }

    pub fn location(&self) -> String {
        self.state.lock().expect("state lock").location.clone()
    }

    fn record(&self, event: String) {
        self.log.lock().expect("log lock").push(event);
    }

    fn go_to(&self, location: &str, view_path: Vec<String>) {
        let mut state = self.state.lock().expect("state lock");
        state.location = location.to_string();
        state.view_path = view_path;
        state.page = 0;
        state.revealed = 0;
        state.topped = false;
        state.generation += 1;
    }

    fn category(&self, path: &[String]) -> Option<&Category> {
        let mut level = &self.spec.categories;
        let mut found = None;
        for name in path {
            let category = level.iter().find(|c| &c.name == name)?;
            level = &category.children;
            found = Some(category);
        }
        found
    }

    fn listing(&self, path: &[String]) -> Option<&Listing> {
        if path.is_empty() {
            Some(&self.spec.root)
        } else {
            self.category(path).map(|c| &c.listing)
        }
    }

    fn visible_products(&self, state: &State) -> Vec<Product> {
        match self.listing(&state.view_path) {
            Some(Listing::Paged(listing)) => {
                if listing.pages.is_empty() {
                    return Vec::new();
                }
                let index = state.page.min(listing.pages.len() - 1);
                if state.page >= listing.pages.len() && listing.next != NextBehavior::Endless {
                    return Vec::new();
                }
                listing.pages[index].clone()
            }
            Some(Listing::Scroll(listing)) => listing
                .batches
                .iter()
                .take(state.revealed + 1)
                .flatten()
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    fn product_at(&self, state: &State, index: usize) -> DomResult<Product> {
        self.visible_products(state)
            .into_iter()
            .nth(index)
            .ok_or_else(|| DomError::StaleHandle(format!("product {index}")))
    }

    fn has_next(&self, state: &State) -> bool {
        match self.listing(&state.view_path) {
            Some(Listing::Paged(listing)) => match listing.next {
                NextBehavior::Endless => true,
                _ => state.page + 1 < listing.pages.len(),
            },
            _ => false,
        }
    }

    fn page_count(&self, state: &State) -> usize {
        match self.listing(&state.view_path) {
            Some(Listing::Paged(listing)) => listing.pages.len(),
            _ => 0,
        }
    }

    fn next_behavior(&self, state: &State) -> NextBehavior {
        match self.listing(&state.view_path) {
            Some(Listing::Paged(listing)) => listing.next,
            _ => NextBehavior::Normal,
        }
    }

    fn page_location(&self, state: &State, page: usize) -> String {
        let base = category_location(&state.view_path);
        if page == 0 {
            base
        } else {
            format!("{base}?page={}", page + 1)
        }
    }

    fn scroll_listing(&self, state: &State) -> Option<&ScrollListing> {
        match self.listing(&state.view_path) {
            Some(Listing::Scroll(listing)) => Some(listing),
            _ => None,
        }
    }

    fn check_fresh(&self, handle: &Node) -> DomResult<()> {
        let current = self.state.lock().expect("state lock").generation;
        match handle.generation() {
            Some(generation) if generation != current => {
                Err(DomError::StaleHandle(format!("{handle:?}")))
            }
            _ => Ok(()),
        }
    }

    fn click_node(&self, handle: &Node) -> DomResult<()> {
        self.check_fresh(handle)?;
        match handle {
            Node::CategoryLink { path, .. } => {
                let Some(category) = self.category(path) else {
                    return Ok(());
                };
                if category.disconnects {
                    return Err(DomError::Disconnected("browser closed".to_string()));
                }
                self.record(format!("click {}", join_category_path(path)));
                if !category.broken {
                    self.go_to(&category_location(path), path.clone());
                }
                Ok(())
            }
            Node::PageLink {
                kind: PageLinkKind::Next,
                ..
            } => {
                let mut state = self.state.lock().expect("state lock");
                match self.next_behavior(&state) {
                    NextBehavior::Broken => {}
                    NextBehavior::ClientSide => {
                        state.page += 1;
                        state.generation += 1;
                    }
                    NextBehavior::Normal | NextBehavior::Endless => {
                        state.page += 1;
                        state.location = self.page_location(&state, state.page);
                        state.generation += 1;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn slug(text: &str) -> String {
    text.to_lowercase().replace(' ', "-")
}

fn category_location(path: &[String]) -> String {
    if path.is_empty() {
        return BASE_URL.to_string();
    }
    let segments: Vec<String> = path.iter().map(|s| slug(s)).collect();
    format!("{BASE_URL}/{}", segments.join("/"))
}

#[async_trait]
impl DomDriver for SimulatedSite {
    type Handle = Node;

    async fn open(&self, url: &str) -> DomResult<()> {
        if self.spec.unreachable {
            return Err(DomError::Disconnected("browser closed".to_string()));
        }
        self.record(format!("open {url}"));
        self.go_to(url, Vec::new());
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> DomResult<Vec<Node>> {
        let sel = &self.selectors;
        let state = self.state.lock().expect("state lock");
        let generation = state.generation;

        if selector == sel.product_container {
            let count = self.visible_products(&state).len();
            return Ok((0..count)
                .map(|index| Node::Product { generation, index })
                .collect());
        }
        if selector == sel.category_links {
            let mut links = vec![Node::CategoryLink {
                generation,
                path: vec!["Home".to_string()],
            }];
            links.extend(self.spec.categories.iter().map(|c| Node::CategoryLink {
                generation,
                path: vec![c.name.clone()],
            }));
            return Ok(links);
        }
        if selector == sel.expanded_menu {
            return Ok((1..=state.view_path.len())
                .map(|depth| Node::MenuEntry {
                    generation,
                    path: state.view_path[..depth].to_vec(),
                })
                .collect());
        }
        if selector == sel.pagination_links {
            let pages = self.page_count(&state);
            if pages <= 1 && !self.has_next(&state) {
                return Ok(Vec::new());
            }
            let mut links: Vec<Node> = (0..pages)
                .map(|n| Node::PageLink {
                    generation,
                    kind: PageLinkKind::Number(n + 1),
                })
                .collect();
            if self.has_next(&state) {
                links.push(Node::PageLink {
                    generation,
                    kind: PageLinkKind::Next,
                });
            }
            return Ok(links);
        }
        if selector == sel.active_page {
            return Ok(if self.page_count(&state) > 0 {
                vec![Node::ActivePage { generation }]
            } else {
                Vec::new()
            });
        }
        if selector == sel.disabled_next {
            let on_last = self.page_count(&state) > 1 && !self.has_next(&state);
            return Ok(if on_last {
                vec![Node::DisabledNext { generation }]
            } else {
                Vec::new()
            });
        }
        if selector == sel.loading_indicator {
            return Ok(if self.spec.stuck_loading {
                vec![Node::Loading]
            } else {
                Vec::new()
            });
        }
        if sel.end_markers.iter().any(|m| m == selector) {
            let done = self.scroll_listing(&state).is_some_and(|listing| {
                listing.end_marker && state.revealed + 1 >= listing.batches.len()
            });
            return Ok(if done && selector == sel.end_markers[0] {
                vec![Node::EndMarker { generation }]
            } else {
                Vec::new()
            });
        }
        Ok(Vec::new())
    }

    async fn query_within(&self, parent: &Node, selector: &str) -> DomResult<Vec<Node>> {
        self.check_fresh(parent)?;
        let sel = &self.selectors;
        match parent {
            Node::Product { generation, index } => {
                let state = self.state.lock().expect("state lock");
                let product = self.product_at(&state, *index)?;
                let generation = *generation;
                let index = *index;
                let field = |kind| vec![Node::Field { generation, index, kind }];
                let found = if selector == sel.title {
                    product.title.map(|_| field(FieldKind::Title))
                } else if selector == sel.price {
                    product.price.map(|_| field(FieldKind::Price))
                } else if selector == sel.description {
                    product.description.map(|_| field(FieldKind::Description))
                } else if selector == sel.rating {
                    product.rating.map(|_| field(FieldKind::Rating))
                } else if selector == sel.review_count {
                    product.rating.map(|_| field(FieldKind::ReviewCount))
                } else if selector == sel.stars {
                    product.rating.map(|(_, stars)| {
                        (0..stars).map(|_| Node::Star { generation }).collect()
                    })
                } else {
                    None
                };
                Ok(found.unwrap_or_default())
            }
            Node::MenuEntry { generation, path } => {
                let generation = *generation;
                if selector == sel.menu_header_link {
                    return Ok(vec![Node::CategoryLink {
                        generation,
                        path: path.clone(),
                    }]);
                }
                if selector == sel.submenu_links {
                    let children = self.category(path).map(|c| c.children.clone()).unwrap_or_default();
                    return Ok(children
                        .iter()
                        .map(|child| {
                            let mut child_path = path.clone();
                            child_path.push(child.name.clone());
                            Node::CategoryLink {
                                generation,
                                path: child_path,
                            }
                        })
                        .collect());
                }
                Ok(Vec::new())
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn text(&self, handle: &Node) -> DomResult<Option<String>> {
        self.check_fresh(handle)?;
        let mut state = self.state.lock().expect("state lock");
        let text = match handle {
            Node::Field { index, kind, .. } => {
                let product = self.product_at(&state, *index)?;
                match kind {
                    FieldKind::Title => {
                        let title = product.title.clone();
                        if let Some(title) = &title {
                            state.title_reads.push(title.clone());
                        }
                        title
                    }
                    FieldKind::Price => product.price,
                    FieldKind::Description => product.description,
                    FieldKind::Rating | FieldKind::ReviewCount => {
                        product.rating.map(|(reviews, _)| format!("{reviews} reviews"))
                    }
                }
            }
            Node::CategoryLink { path, .. } => path.last().cloned(),
            Node::PageLink { kind, .. } => Some(match kind {
                PageLinkKind::Number(n) => n.to_string(),
                PageLinkKind::Next => "›".to_string(),
            }),
            Node::ActivePage { .. } => Some((state.page + 1).to_string()),
            Node::DisabledNext { .. } => Some("›".to_string()),
            Node::Loading => Some("Loading...".to_string()),
            Node::EndMarker { .. } => Some("No more products".to_string()),
            Node::Product { .. } | Node::Star { .. } | Node::MenuEntry { .. } => None,
        };
        Ok(text)
    }

    async fn attribute(&self, handle: &Node, name: &str) -> DomResult<Option<String>> {
        self.check_fresh(handle)?;
        let state = self.state.lock().expect("state lock");
        match (handle, name) {
            (
                Node::Field {
                    index,
                    kind: FieldKind::Title,
                    ..
                },
                "href",
            ) => Ok(self.product_at(&state, *index)?.url),
            (Node::PageLink { kind, .. }, "href") => Ok(Some(match (kind, self.next_behavior(&state)) {
                (_, NextBehavior::ClientSide | NextBehavior::Broken) => "#".to_string(),
                (PageLinkKind::Number(n), _) => self.page_location(&state, n - 1),
                (PageLinkKind::Next, _) => self.page_location(&state, state.page + 1),
            })),
            _ => Ok(None),
        }
    }

    async fn is_visible(&self, handle: &Node) -> DomResult<bool> {
        self.check_fresh(handle)?;
        Ok(true)
    }

    async fn click(&self, handle: &Node) -> DomResult<()> {
        self.click_node(handle)
    }

    async fn js_click(&self, handle: &Node) -> DomResult<()> {
        self.click_node(handle)
    }

    async fn scroll_into_view(&self, handle: &Node) -> DomResult<()> {
        self.check_fresh(handle)
    }

    async fn scroll_to_bottom(&self) -> DomResult<()> {
        let mut state = self.state.lock().expect("state lock");
        state.scrolls += 1;
        let Some(listing) = self.scroll_listing(&state) else {
            return Ok(());
        };
        let throttled = listing
            .throttle_after
            .is_some_and(|after| state.revealed + 1 >= after && !state.topped);
        if !throttled && state.revealed + 1 < listing.batches.len() {
            state.revealed += 1;
        }
        Ok(())
    }

    async fn scroll_to_top(&self) -> DomResult<()> {
        self.state.lock().expect("state lock").topped = true;
        Ok(())
    }

    async fn document_height(&self) -> DomResult<i64> {
        let state = self.state.lock().expect("state lock");
        let cards = i64::try_from(self.visible_products(&state).len()).unwrap_or(i64::MAX);
        let drift = if self.scroll_listing(&state).is_some_and(|l| l.height_drift) {
            i64::try_from(state.scrolls).unwrap_or(0) * 40
        } else {
            0
        };
        Ok(800 + cards * 300 + drift)
    }

    async fn current_location(&self) -> DomResult<String> {
        Ok(self.location())
    }

    async fn run_script(&self, _source: &str, _args: Vec<Value>) -> DomResult<Value> {
        Ok(Value::Null)
    }
}

/// Progress reporter that appends scope resets and skips to an event log
pub struct RecordingProgress {
    log: EventLog,
    pub views: Mutex<Vec<ViewSummary>>,
}

#[allow(dead_code)]
impl RecordingProgress {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            views: Mutex::new(Vec::new()),
        }
    }
}

impl HarvestProgress for RecordingProgress {
    fn session_started(&self, _base_url: &str) {}

    fn scope_reset(&self, category_path: &str) {
        self.log
            .lock()
            .expect("log lock")
            .push(format!("reset {category_path}"));
    }

    fn category_entered(&self, _category_path: &str) {}

    fn view_finished(&self, summary: &ViewSummary) {
        self.views.lock().expect("views lock").push(summary.clone());
    }

    fn category_skipped(&self, category_path: &str, _reason: &str) {
        self.log
            .lock()
            .expect("log lock")
            .push(format!("skip {category_path}"));
    }

    fn deduplicated(&self, _dropped: usize) {}

    fn saved(&self, _count: usize, _saved: bool) {}

    fn completed(&self, _report: &SessionReport) {}
}

/// Sink that keeps what it was handed
#[derive(Default)]
pub struct MemorySink {
    pub saved: Mutex<Vec<Record>>,
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn save(&self, records: &[Record]) -> Result<bool> {
        if records.is_empty() {
            return Ok(false);
        }
        self.saved.lock().expect("sink lock").extend_from_slice(records);
        Ok(true)
    }
}

/// Sink whose storage is always broken
#[allow(dead_code)]
pub struct FailingSink;

#[async_trait]
impl RecordSink for FailingSink {
    async fn save(&self, _records: &[Record]) -> Result<bool> {
        Err(anyhow::anyhow!("disk full"))
    }
}

/// Config with waits shrunk to a few milliseconds
#[allow(dead_code)]
pub fn fast_config(mode: ListingMode) -> HarvestConfig {
    HarvestConfig::builder()
        .output_dir(std::env::temp_dir())
        .base_url(BASE_URL)
        .listing_mode(mode)
        .scroll_settle_ms(0)
        .page_settle_ms(0)
        .expand_settle_ms(0)
        .poll_interval_ms(1)
        .navigation_timeout_ms(30)
        .element_timeout_ms(10)
        .loading_timeout_ms(5)
        .build()
        .expect("fast config is valid")
}

/// Navigation events (`open`, `click`, `reset`, `skip`) in order
#[allow(dead_code)]
pub fn navigation_events(log: &EventLog) -> Vec<String> {
    log.lock().expect("log lock").clone()
}
