//! meds.se search results.

use scraper::ElementRef;
use shelfscan_core::{ProductField, ProductRecord, RetailerFamily};

use crate::normalize::{normalize_price, resolve_url};
use crate::selectors::{CardSelectors, FieldChain, FieldRule};

use super::{parse_cards, RetailerParser};

/// Prices on meds.se are always kronor; the markup only carries `kr`.
const CURRENCY: &str = "SEK";

const SCHEMA: &[ProductField] = &[
    ProductField::Title,
    ProductField::Price,
    ProductField::Currency,
    ProductField::Link,
    ProductField::Image,
];

const CARDS: &[&str] = &["div.product-card"];

const TITLE: &[FieldRule] = &[FieldRule::text("span.display-name")];
const PRICE: &[FieldRule] = &[FieldRule::text("div.displayed-price")];
const LINK: &[FieldRule] = &[FieldRule::attr("a", "href")];
const IMAGE: &[FieldRule] = &[FieldRule::attr("img", "src")];

#[derive(Debug)]
pub struct MedsParser {
    cards: CardSelectors,
    title: FieldChain,
    price: FieldChain,
    link: FieldChain,
    image: FieldChain,
}

impl MedsParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cards: CardSelectors::compile(CARDS),
            title: FieldChain::compile(TITLE),
            price: FieldChain::compile(PRICE),
            link: FieldChain::compile(LINK),
            image: FieldChain::compile(IMAGE),
        }
    }

    fn parse_card(&self, card: ElementRef<'_>, base_url: &str) -> Option<ProductRecord> {
        let title = self.title.first(card)?;
        let price = self.price.first(card).as_deref().and_then(normalize_price);
        let currency = price.as_ref().map(|_| CURRENCY.to_owned());

        Some(ProductRecord {
            title,
            price,
            currency,
            link: self
                .link
                .first(card)
                .and_then(|href| resolve_url(base_url, &href)),
            image: self
                .image
                .first(card)
                .and_then(|src| resolve_url(base_url, &src)),
            ..ProductRecord::default()
        })
    }
}

impl Default for MedsParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RetailerParser for MedsParser {
    fn family(&self) -> RetailerFamily {
        RetailerFamily::Meds
    }

    fn schema(&self) -> &'static [ProductField] {
        SCHEMA
    }

    fn parse_products(&self, html: &str, base_url: &str) -> Vec<ProductRecord> {
        parse_cards(RetailerFamily::Meds, html, &self.cards, |card| {
            self.parse_card(card, base_url)
        })
    }
}
