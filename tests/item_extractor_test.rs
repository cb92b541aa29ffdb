//! Extraction adapter over simulated product cards

use shelfwalk::dom::DomDriver;
use shelfwalk::record::ReviewCount;
use shelfwalk::{Extraction, Field, ItemExtractor, SiteSelectors};

mod common;

use common::{Product, SimulatedSite, one_page, product};

async fn extract_all(items: Vec<Product>) -> Vec<Extraction> {
    let selectors = SiteSelectors::default();
    let site = SimulatedSite::loaded(one_page(items));
    let extractor = ItemExtractor::new(&selectors);
    let mut out = Vec::new();
    for card in site.query_all(&selectors.product_container).await.unwrap() {
        out.push(extractor.extract(&site, &card).await.unwrap());
    }
    out
}

#[tokio::test]
async fn test_complete_card() {
    let extractions = extract_all(vec![Product {
        rating: Some((14, 3)),
        ..product("Asus VivoBook X441NA-GA190", "$295.99")
    }])
    .await;

    let Extraction::Complete(record) = &extractions[0] else {
        panic!("Expected a complete extraction, got: {:?}", extractions[0]);
    };
    assert_eq!(record.title, "Asus VivoBook X441NA-GA190");
    assert_eq!(record.price, "$295.99");
    assert_eq!(record.price_value, Some(295.99));
    assert_eq!(record.rating.as_deref(), Some("14 reviews"));
    assert_eq!(record.review_count, ReviewCount::Count(14));
    assert_eq!(record.stars, 3);
    assert_eq!(record.url.as_deref(), Some("/product/asus-vivobook-x441na-ga190"));
    assert!(record.category_path.is_empty());
}

#[tokio::test]
async fn test_missing_fields_are_reported_as_gaps() {
    let extractions = extract_all(vec![Product {
        description: None,
        rating: None,
        url: None,
        ..product("Nokia 105", "$24.99")
    }])
    .await;

    assert_eq!(
        extractions[0].gaps(),
        &[Field::Description, Field::Rating, Field::Url]
    );
    let record = extractions[0].clone().into_record().unwrap();
    assert_eq!(record.title, "Nokia 105");
    assert!(record.description.is_empty());
    assert_eq!(record.stars, 0);
    assert_eq!(record.review_count, ReviewCount::Count(0));
}

#[tokio::test]
async fn test_card_without_title_is_unusable() {
    let extractions = extract_all(vec![
        Product {
            title: None,
            ..product("ghost", "$1.00")
        },
        Product {
            title: Some("   ".to_string()),
            ..product("blank", "$2.00")
        },
    ])
    .await;

    assert_eq!(extractions, vec![Extraction::Unusable, Extraction::Unusable]);
}

#[tokio::test]
async fn test_stale_card_degrades_instead_of_failing() {
    let selectors = SiteSelectors::default();
    let site = SimulatedSite::loaded(one_page(vec![product("Lenovo", "$416.99")]));
    let cards = site.query_all(&selectors.product_container).await.unwrap();

    // navigation invalidates every handle taken before it
    site.open("https://shop.test/elsewhere").await.unwrap();

    let extraction = ItemExtractor::new(&selectors)
        .extract(&site, &cards[0])
        .await
        .unwrap();
    assert_eq!(extraction, Extraction::Unusable);
}
