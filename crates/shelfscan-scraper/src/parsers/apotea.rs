//! apotea.se search results.
//!
//! Apotea has shipped several listing layouts; the card and field tables list
//! the current one first and older ones after it.

use scraper::ElementRef;
use shelfscan_core::{ProductField, ProductRecord, RetailerFamily};

use crate::normalize::{normalize_price, resolve_url};
use crate::selectors::{CardSelectors, FieldChain, FieldRule};

use super::{parse_cards, RetailerParser};

const CURRENCY: &str = "SEK";

const SCHEMA: &[ProductField] = &[
    ProductField::Title,
    ProductField::Price,
    ProductField::Currency,
    ProductField::PackSize,
    ProductField::Link,
    ProductField::Image,
];

const CARDS: &[&str] = &[
    "div.product-card",
    "article.product-item",
    "li.product-list-item",
];

const TITLE: &[FieldRule] = &[
    FieldRule::text("h3.product-name"),
    FieldRule::text(r#"[data-testid="product-title"]"#),
    FieldRule::attr("a.product-link", "title"),
    FieldRule::attr("img", "alt"),
];
const PRICE: &[FieldRule] = &[
    FieldRule::text("span.price-current"),
    FieldRule::text("span.price"),
    FieldRule::text(r#"[data-testid="product-price"]"#),
];
const PACK_SIZE: &[FieldRule] = &[
    FieldRule::text("span.product-package-size"),
    FieldRule::text(".product-subtitle"),
];
const LINK: &[FieldRule] = &[
    FieldRule::attr("a.product-link", "href"),
    FieldRule::attr("a", "href"),
];
const IMAGE: &[FieldRule] = &[
    FieldRule::attr("img", "data-src"),
    FieldRule::attr("img", "src"),
];

#[derive(Debug)]
pub struct ApoteaParser {
    cards: CardSelectors,
    title: FieldChain,
    price: FieldChain,
    pack_size: FieldChain,
    link: FieldChain,
    image: FieldChain,
}

impl ApoteaParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cards: CardSelectors::compile(CARDS),
            title: FieldChain::compile(TITLE),
            price: FieldChain::compile(PRICE),
            pack_size: FieldChain::compile(PACK_SIZE),
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
            pack_size: self.pack_size.first(card),
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

impl Default for ApoteaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RetailerParser for ApoteaParser {
    fn family(&self) -> RetailerFamily {
        RetailerFamily::Apotea
    }

    fn schema(&self) -> &'static [ProductField] {
        SCHEMA
    }

    fn parse_products(&self, html: &str, base_url: &str) -> Vec<ProductRecord> {
        parse_cards(RetailerFamily::Apotea, html, &self.cards, |card| {
            self.parse_card(card, base_url)
        })
    }
}
