//! Record identity keys
//!
//! The key is `title|price|description-prefix`. Only a bounded prefix of the
//! description takes part, so trailing rendering differences in long
//! descriptions do not split one product into two. Distinct products that share
//! title, price and prefix collide; that is accepted.

use std::fmt;

use super::Record;
use crate::utils::DESCRIPTION_PREFIX_CHARS;
use crate::utils::string_utils::safe_truncate_chars;

/// Identity key of a record for deduplication
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the identity key of a record. Never fails: missing fields are empty.
#[must_use]
pub fn fingerprint(record: &Record) -> Fingerprint {
    fingerprint_parts(&record.title, &record.price, &record.description)
}

/// Derive the identity key from raw field text
#[must_use]
pub fn fingerprint_parts(title: &str, price: &str, description: &str) -> Fingerprint {
    let prefix = safe_truncate_chars(description, DESCRIPTION_PREFIX_CHARS);
    Fingerprint(format!("{title}|{price}|{prefix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ReviewCount;
    use proptest::prelude::*;

    #[test]
    fn test_key_layout() {
        let record = Record::new("Asus VivoBook", "$295.99", "Asus VivoBook X441NA-GA190");
        assert_eq!(
            fingerprint(&record).as_str(),
            "Asus VivoBook|$295.99|Asus VivoBook X441NA-GA190"
        );
    }

    #[test]
    fn test_missing_fields_map_to_empty() {
        let record = Record::default();
        assert_eq!(fingerprint(&record).as_str(), "||");
    }

    #[test]
    fn test_description_is_cut_to_prefix() {
        let long = "x".repeat(80);
        let record = Record::new("T", "$1", long);
        assert_eq!(fingerprint(&record).as_str(), format!("T|$1|{}", "x".repeat(50)));
    }

    #[test]
    fn test_prefix_counts_characters_not_bytes() {
        let description = "é".repeat(60);
        let key = fingerprint_parts("T", "$1", &description);
        assert_eq!(key.as_str().chars().filter(|c| *c == 'é').count(), 50);
    }

    #[test]
    fn test_other_fields_do_not_affect_key() {
        let mut a = Record::new("Acer", "$10", "Aspire");
        let mut b = a.clone();
        a.stars = 1;
        a.rating = Some("1 review".to_string());
        a.category_path = "Computers".to_string();
        b.stars = 5;
        b.review_count = ReviewCount::Count(99);
        b.url = Some("https://example.com/acer".to_string());
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    proptest! {
        #[test]
        fn prop_equal_identity_fields_give_equal_keys(
            title in ".{0,20}",
            price in ".{0,10}",
            prefix in ".{50}",
            tail_a in ".{0,30}",
            tail_b in ".{0,30}",
            stars_a in 0u32..6,
            stars_b in 0u32..6,
        ) {
            let mut a = Record::new(title.clone(), price.clone(), format!("{prefix}{tail_a}"));
            let mut b = Record::new(title, price, format!("{prefix}{tail_b}"));
            a.stars = stars_a;
            b.stars = stars_b;
            b.category_path = "elsewhere".to_string();
            prop_assert_eq!(fingerprint(&a), fingerprint(&b));
        }

        #[test]
        fn prop_fingerprint_is_deterministic(title in ".{0,20}", description in ".{0,80}") {
            let record = Record::new(title, "$1", description);
            prop_assert_eq!(fingerprint(&record), fingerprint(&record.clone()));
        }
    }
}
