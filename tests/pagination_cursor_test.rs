//! Pagination cursor against the simulated listing site

use shelfwalk::dom::DomDriver;
use shelfwalk::harvest_engine::{CursorStatus, PaginationCursor, StopReason};
use shelfwalk::{ListingMode, SeenSetRegistry};

mod common;

use common::{
    BASE_URL, NextBehavior, Product, SimulatedSite, SiteSpec, fast_config, one_page, paged,
    product, products,
};

#[tokio::test]
async fn test_walks_every_page_until_next_disappears() {
    let config = fast_config(ListingMode::Pagination);
    let site = SimulatedSite::loaded(paged(
        vec![products("Laptop", 4), products("Tablet", 4), products("Phone", 4)],
        NextBehavior::Normal,
    ));
    let mut seen = SeenSetRegistry::new();

    let view = PaginationCursor::new(&config)
        .collect(&site, &mut seen, "Computers")
        .await
        .unwrap();

    assert_eq!(view.reason, StopReason::NoNextPage);
    assert_eq!(view.status(), CursorStatus::Exhausted);
    assert_eq!(view.rounds, 3);
    assert_eq!(view.records.len(), 12);
    assert_eq!(view.records[0].title, "Laptop 1");
    assert_eq!(view.records[11].title, "Phone 4");
    assert!(view.records.iter().all(|r| r.category_path == "Computers"));
    assert_eq!(site.location(), format!("{BASE_URL}?page=3"));
}

#[tokio::test]
async fn test_page_ceiling_stops_before_clicking_next() {
    let config = fast_config(ListingMode::Pagination)
        .into_builder()
        .max_pages(2)
        .build()
        .unwrap();
    let site = SimulatedSite::loaded(paged(
        vec![products("Laptop", 4), products("Tablet", 4), products("Phone", 4)],
        NextBehavior::Normal,
    ));
    let mut seen = SeenSetRegistry::new();

    let view = PaginationCursor::new(&config)
        .collect(&site, &mut seen, "Computers")
        .await
        .unwrap();

    assert_eq!(view.reason, StopReason::PageCeiling);
    assert_eq!(view.rounds, 2);
    assert_eq!(view.records.len(), 8);
    assert_eq!(site.location(), format!("{BASE_URL}?page=2"));
}

#[tokio::test]
async fn test_repeated_last_page_runs_into_the_ceiling_without_duplicates() {
    let config = fast_config(ListingMode::Pagination)
        .into_builder()
        .max_pages(4)
        .build()
        .unwrap();
    let site = SimulatedSite::loaded(paged(
        vec![products("Laptop", 4), products("Tablet", 4)],
        NextBehavior::Endless,
    ));
    let mut seen = SeenSetRegistry::new();

    let view = PaginationCursor::new(&config)
        .collect(&site, &mut seen, "Computers")
        .await
        .unwrap();

    assert_eq!(view.reason, StopReason::PageCeiling);
    assert_eq!(view.rounds, 4);
    assert_eq!(view.records.len(), 8);
    assert_eq!(view.stats.duplicates, 8);
    assert_eq!(view.stats.extracted, 16);
}

#[tokio::test]
async fn test_click_without_movement_ends_the_view() {
    let config = fast_config(ListingMode::Pagination);
    let site = SimulatedSite::loaded(paged(
        vec![products("Laptop", 4), products("Tablet", 4)],
        NextBehavior::Broken,
    ));
    let mut seen = SeenSetRegistry::new();

    let view = PaginationCursor::new(&config)
        .collect(&site, &mut seen, "Computers")
        .await
        .unwrap();

    assert_eq!(view.reason, StopReason::NavigationUnconfirmed);
    assert_eq!(view.status(), CursorStatus::Exhausted);
    assert_eq!(view.rounds, 1);
    assert_eq!(view.records.len(), 4);
}

#[tokio::test]
async fn test_client_side_paging_is_confirmed_by_page_indicator() {
    let config = fast_config(ListingMode::Pagination);
    let site = SimulatedSite::loaded(paged(
        vec![products("Laptop", 2), products("Tablet", 2), products("Phone", 2)],
        NextBehavior::ClientSide,
    ));
    let mut seen = SeenSetRegistry::new();

    let view = PaginationCursor::new(&config)
        .collect(&site, &mut seen, "")
        .await
        .unwrap();

    assert_eq!(view.reason, StopReason::NoNextPage);
    assert_eq!(view.rounds, 3);
    assert_eq!(view.records.len(), 6);
    assert_eq!(site.location(), BASE_URL);
}

#[tokio::test]
async fn test_product_repeated_on_next_page_is_emitted_once() {
    let config = fast_config(ListingMode::Pagination);
    let mut second = products("Tablet", 3);
    second.push(product("Laptop 1", "$11.99"));
    let site = SimulatedSite::loaded(paged(
        vec![products("Laptop", 4), second],
        NextBehavior::Normal,
    ));
    let mut seen = SeenSetRegistry::new();

    let view = PaginationCursor::new(&config)
        .collect(&site, &mut seen, "Computers")
        .await
        .unwrap();

    assert_eq!(view.records.len(), 7);
    assert_eq!(view.stats.duplicates, 1);
    let laptops = view.records.iter().filter(|r| r.title == "Laptop 1").count();
    assert_eq!(laptops, 1);
}

#[tokio::test]
async fn test_empty_listing_yields_no_records() {
    let config = fast_config(ListingMode::Pagination);
    let site = SimulatedSite::loaded(one_page(Vec::new()));
    let mut seen = SeenSetRegistry::new();

    let view = PaginationCursor::new(&config)
        .collect(&site, &mut seen, "Empty")
        .await
        .unwrap();

    assert!(view.records.is_empty());
    assert_eq!(view.rounds, 1);
    assert_eq!(view.reason, StopReason::NoNextPage);
}

#[tokio::test]
async fn test_stuck_loading_indicator_does_not_block_reading() {
    let config = fast_config(ListingMode::Pagination);
    let site = SimulatedSite::new(SiteSpec {
        root: one_page(products("Laptop", 3)),
        stuck_loading: true,
        ..SiteSpec::default()
    });
    site.open(BASE_URL).await.unwrap();
    let mut seen = SeenSetRegistry::new();

    let view = PaginationCursor::new(&config)
        .collect(&site, &mut seen, "")
        .await
        .unwrap();

    assert_eq!(view.records.len(), 3);
}

#[tokio::test]
async fn test_partial_and_unusable_cards() {
    let config = fast_config(ListingMode::Pagination);
    let no_title = Product {
        title: None,
        ..product("ghost", "$1.00")
    };
    let no_price = Product {
        price: None,
        ..product("Mystery Box", "$0")
    };
    let site = SimulatedSite::loaded(one_page(vec![
        product("Laptop 1", "$11.99"),
        no_title,
        no_price,
    ]));
    let mut seen = SeenSetRegistry::new();

    let view = PaginationCursor::new(&config)
        .collect(&site, &mut seen, "Misc")
        .await
        .unwrap();

    assert_eq!(view.stats.extracted, 3);
    assert_eq!(view.stats.unusable, 1);
    assert_eq!(view.stats.partial, 1);
    assert_eq!(view.records.len(), 2);
    let mystery = &view.records[1];
    assert_eq!(mystery.title, "Mystery Box");
    assert!(mystery.price.is_empty());
    assert_eq!(mystery.price_value, None);
}
