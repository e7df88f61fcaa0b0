//! Order-preserving deduplication of extracted records.
//!
//! Input order matters: the first occurrence of a key survives, later ones are
//! dropped. Callers pass the concatenated page output in page order.

use std::collections::HashSet;
use std::str::FromStr;

use shelfscan_core::ProductRecord;

/// Which field decides that two records are the same product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupKey {
    /// Resolved product URL.
    #[default]
    Link,
    /// Case-folded, whitespace-collapsed title.
    Title,
    /// Title and link together; both must be present.
    TitleAndLink,
}

impl DedupKey {
    /// Key extractor for this strategy.
    #[must_use]
    pub fn key_fn(self) -> fn(&ProductRecord) -> Option<String> {
        match self {
            DedupKey::Link => link_key,
            DedupKey::Title => title_key,
            DedupKey::TitleAndLink => title_and_link_key,
        }
    }
}

impl FromStr for DedupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "link" => Ok(DedupKey::Link),
            "title" => Ok(DedupKey::Title),
            "title-and-link" | "title_and_link" => Ok(DedupKey::TitleAndLink),
            other => Err(format!(
                "unknown dedup key \"{other}\"; expected link, title or title-and-link"
            )),
        }
    }
}

impl std::fmt::Display for DedupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DedupKey::Link => "link",
            DedupKey::Title => "title",
            DedupKey::TitleAndLink => "title-and-link",
        })
    }
}

#[must_use]
pub fn link_key(record: &ProductRecord) -> Option<String> {
    record.link.clone()
}

fn title_key(record: &ProductRecord) -> Option<String> {
    let folded = record
        .title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    (!folded.is_empty()).then_some(folded)
}

fn title_and_link_key(record: &ProductRecord) -> Option<String> {
    Some(format!("{}\u{1f}{}", title_key(record)?, record.link.as_deref()?))
}

/// Keeps the first record for each key, in input order.
///
/// Records whose key is `None` are all kept: a missing key never makes two
/// records equal. Applying the function twice gives the same result as once.
#[must_use]
pub fn dedup_by_key<K>(records: Vec<ProductRecord>, key: K) -> Vec<ProductRecord>
where
    K: Fn(&ProductRecord) -> Option<String>,
{
    let mut seen = HashSet::new();
    let before = records.len();

    let unique: Vec<ProductRecord> = records
        .into_iter()
        .filter(|record| match key(record) {
            Some(k) => seen.insert(k),
            None => true,
        })
        .collect();

    tracing::debug!(before, after = unique.len(), "deduplicated records");
    unique
}

/// [`dedup_by_key`] with the resolved link as key.
#[must_use]
pub fn dedup_by_link(records: Vec<ProductRecord>) -> Vec<ProductRecord> {
    dedup_by_key(records, link_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, link: Option<&str>) -> ProductRecord {
        ProductRecord {
            link: link.map(str::to_owned),
            ..ProductRecord::titled(title)
        }
    }

    fn titles(records: &[ProductRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn keeps_first_occurrence() {
        let records = vec![
            record("first", Some("https://amazon.de/dp/1")),
            record("other", Some("https://amazon.de/dp/2")),
            record("second copy", Some("https://amazon.de/dp/1")),
        ];
        assert_eq!(titles(&dedup_by_link(records)), ["first", "other"]);
    }

    #[test]
    fn records_without_link_are_never_merged() {
        let records = vec![
            record("a", None),
            record("a", None),
            record("b", Some("https://amazon.de/dp/1")),
        ];
        assert_eq!(dedup_by_link(records).len(), 3);
    }

    #[test]
    fn idempotent() {
        let records = vec![
            record("a", Some("x")),
            record("b", None),
            record("c", Some("x")),
            record("d", Some("y")),
            record("e", None),
        ];
        let once = dedup_by_link(records);
        let twice = dedup_by_link(once.clone());
        assert_eq!(once, twice);
        assert_eq!(titles(&once), ["a", "b", "d", "e"]);
    }

    #[test]
    fn custom_key_function() {
        let records = vec![
            record("Avent  Bottle", Some("https://a/1")),
            record("avent bottle", Some("https://a/2")),
        ];
        assert_eq!(dedup_by_key(records.clone(), DedupKey::Title.key_fn()).len(), 1);
        assert_eq!(dedup_by_key(records.clone(), DedupKey::Link.key_fn()).len(), 2);
        assert_eq!(
            dedup_by_key(records, DedupKey::TitleAndLink.key_fn()).len(),
            2
        );
    }

    #[test]
    fn title_and_link_needs_both() {
        let records = vec![record("a", None), record("a", None)];
        assert_eq!(dedup_by_key(records, DedupKey::TitleAndLink.key_fn()).len(), 2);
    }

    #[test]
    fn parses_from_cli_spelling() {
        assert_eq!("link".parse::<DedupKey>().unwrap(), DedupKey::Link);
        assert_eq!("Title".parse::<DedupKey>().unwrap(), DedupKey::Title);
        assert_eq!(
            "title-and-link".parse::<DedupKey>().unwrap(),
            DedupKey::TitleAndLink
        );
        assert!("asin".parse::<DedupKey>().is_err());
        assert_eq!(DedupKey::default().to_string(), "link");
    }
}
