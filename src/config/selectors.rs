//! CSS selectors describing one listing site
//!
//! Defaults match the webscraper.io e-commerce test shops (all-in-one, static
//! and scroll variants), which share markup.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    /// One element per product card
    pub product_container: String,
    pub title: String,
    pub price: String,
    pub description: String,
    pub rating: String,
    pub review_count: String,
    /// One match per filled star inside a card
    pub stars: String,
    /// Anchor inside the title when the title element is not itself a link
    pub title_link: String,

    pub loading_indicator: String,
    /// Any visible match ends an infinite-scroll view
    pub end_markers: Vec<String>,

    /// Top-level category links of the side menu
    pub category_links: String,
    /// Menu entries currently disclosed (open or active)
    pub expanded_menu: String,
    /// Header link of an expanded menu entry, relative to the entry
    pub menu_header_link: String,
    /// Child links of an expanded menu entry, relative to the entry
    pub submenu_links: String,
    /// Category names that are never walked
    pub skip_categories: Vec<String>,

    /// Links of the pagination control
    pub pagination_links: String,
    /// Text marking the "next" link among `pagination_links`
    pub next_page_text: String,
    /// Indicator of the current page number
    pub active_page: String,
    /// Non-link placeholder shown instead of "next" on the last page
    pub disabled_next: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            product_container: ".thumbnail".to_string(),
            title: ".title".to_string(),
            price: ".price".to_string(),
            description: ".description".to_string(),
            rating: ".ratings".to_string(),
            review_count: ".ratings .pull-right".to_string(),
            stars: ".ratings .glyphicon-star".to_string(),
            title_link: "a".to_string(),
            loading_indicator: ".loading-indicator".to_string(),
            end_markers: vec![".end-of-results".to_string(), ".no-more-products".to_string()],
            category_links: ".sidebar-nav > li > a".to_string(),
            expanded_menu: ".sidebar-nav li.open, .sidebar-nav li.active".to_string(),
            menu_header_link: "a".to_string(),
            submenu_links: "ul li a".to_string(),
            skip_categories: vec!["home".to_string()],
            pagination_links: "ul.pagination li a".to_string(),
            next_page_text: "›".to_string(),
            active_page: "ul.pagination > li.active".to_string(),
            disabled_next: "ul.pagination li.disabled > span".to_string(),
        }
    }
}

impl SiteSelectors {
    /// Whether a menu entry named `name` is excluded from the walk
    #[must_use]
    pub fn is_skipped_category(&self, name: &str) -> bool {
        let name = name.trim();
        self.skip_categories
            .iter()
            .any(|skip| skip.eq_ignore_ascii_case(name))
    }
}
