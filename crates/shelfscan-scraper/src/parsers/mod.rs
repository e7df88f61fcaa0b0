//! Per-retailer search-result parsers.
//!
//! Every parser implements [`RetailerParser`]: one HTML document in, the
//! product records it contains out, in document order. Parsers never fail;
//! garbled markup yields fewer cards or fewer fields.

mod amazon;
mod apotea;
mod meds;

use scraper::{ElementRef, Html};
use shelfscan_core::{ProductField, ProductRecord, RetailerFamily};

use crate::selectors::CardSelectors;

pub use amazon::AmazonParser;
pub use apotea::ApoteaParser;
pub use meds::MedsParser;

/// Converts one search-results page into normalized product records.
pub trait RetailerParser: Send + Sync {
    fn family(&self) -> RetailerFamily;

    /// Ordered columns this retailer can populate.
    fn schema(&self) -> &'static [ProductField];

    /// Extracts every titled product card on the page, in document order.
    /// Links and images are resolved against `base_url`.
    fn parse_products(&self, html: &str, base_url: &str) -> Vec<ProductRecord>;
}

/// Builds the parser for a retailer family. Selector tables are compiled here,
/// once per pipeline.
#[must_use]
pub fn parser_for(family: RetailerFamily) -> Box<dyn RetailerParser> {
    match family {
        RetailerFamily::Amazon => Box::new(AmazonParser::new()),
        RetailerFamily::Meds => Box::new(MedsParser::new()),
        RetailerFamily::Apotea => Box::new(ApoteaParser::new()),
    }
}

/// Shared card loop: selects cards, runs `parse_card` on each, and drops the
/// ones that yield no record (no title).
fn parse_cards<F>(
    family: RetailerFamily,
    html: &str,
    cards: &CardSelectors,
    mut parse_card: F,
) -> Vec<ProductRecord>
where
    F: FnMut(ElementRef<'_>) -> Option<ProductRecord>,
{
    let document = Html::parse_document(html);
    let card_elements = cards.select(&document);
    let card_count = card_elements.len();

    let records: Vec<ProductRecord> = card_elements.into_iter().filter_map(&mut parse_card).collect();

    let dropped = card_count - records.len();
    if dropped > 0 {
        tracing::debug!(%family, dropped, "skipped product cards without a title");
    }
    records
}
