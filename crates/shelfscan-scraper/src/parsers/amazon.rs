//! Amazon search results (`/s?k=…`), shared by every Amazon storefront.
//!
//! Prices are usually split into `a-price-whole` / `a-price-fraction` spans;
//! some layouts only carry the screen-reader `a-offscreen` string
//! (`"$19.99"`, `"19,99 €"`), which is the fallback.

use scraper::ElementRef;
use shelfscan_core::{ProductField, ProductRecord, RetailerFamily};

use crate::normalize::{
    currency_from_price_text, join_split_price, normalize_count, normalize_price,
    normalize_rating, resolve_url,
};
use crate::selectors::{CardSelectors, FieldChain, FieldRule};

use super::{parse_cards, RetailerParser};

const SCHEMA: &[ProductField] = &[
    ProductField::Title,
    ProductField::Price,
    ProductField::Currency,
    ProductField::Rating,
    ProductField::ReviewsCount,
    ProductField::PackSize,
    ProductField::Link,
];

const CARDS: &[&str] = &[r#"div[data-component-type="s-search-result"]"#];

const TITLE: &[FieldRule] = &[
    FieldRule::text("h2 a span"),
    FieldRule::attr("h2 a", "aria-label"),
    FieldRule::text("h2 span"),
    FieldRule::attr("img", "alt"),
];
const PRICE_WHOLE: &[FieldRule] = &[FieldRule::text("span.a-price-whole")];
const PRICE_FRACTION: &[FieldRule] = &[FieldRule::text("span.a-price-fraction")];
const PRICE_COMBINED: &[FieldRule] = &[
    FieldRule::text("span.a-price span.a-offscreen"),
    FieldRule::text("span.a-offscreen"),
];
const CURRENCY_SYMBOL: &[FieldRule] = &[FieldRule::text("span.a-price-symbol")];
const RATING: &[FieldRule] = &[
    FieldRule::text("span.a-icon-alt"),
    FieldRule::attr("i.a-icon-star-small", "aria-label"),
];
const REVIEWS: &[FieldRule] = &[
    FieldRule::text("span.a-size-base.s-underline-text"),
    FieldRule::attr(r#"a[href*="customerReviews"]"#, "aria-label"),
];
const PACK_SIZE: &[FieldRule] = &[FieldRule::text("div.a-row.a-size-base span.a-size-base")];
const LINK: &[FieldRule] = &[
    FieldRule::attr("h2 a", "href"),
    FieldRule::attr("a.a-link-normal", "href"),
    FieldRule::attr("a", "href"),
];

#[derive(Debug)]
pub struct AmazonParser {
    cards: CardSelectors,
    title: FieldChain,
    price_whole: FieldChain,
    price_fraction: FieldChain,
    price_combined: FieldChain,
    currency_symbol: FieldChain,
    rating: FieldChain,
    reviews: FieldChain,
    pack_size: FieldChain,
    link: FieldChain,
}

impl AmazonParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cards: CardSelectors::compile(CARDS),
            title: FieldChain::compile(TITLE),
            price_whole: FieldChain::compile(PRICE_WHOLE),
            price_fraction: FieldChain::compile(PRICE_FRACTION),
            price_combined: FieldChain::compile(PRICE_COMBINED),
            currency_symbol: FieldChain::compile(CURRENCY_SYMBOL),
            rating: FieldChain::compile(RATING),
            reviews: FieldChain::compile(REVIEWS),
            pack_size: FieldChain::compile(PACK_SIZE),
            link: FieldChain::compile(LINK),
        }
    }

    fn parse_card(&self, card: ElementRef<'_>, base_url: &str) -> Option<ProductRecord> {
        let title = self.title.first(card)?;
        let (price, currency) = self.price_and_currency(card);

        Some(ProductRecord {
            title,
            price,
            currency,
            rating: self.rating.first(card).as_deref().and_then(normalize_rating),
            reviews_count: self.reviews.first(card).as_deref().and_then(normalize_count),
            pack_size: self.pack_size.first(card),
            link: self
                .link
                .first(card)
                .and_then(|href| resolve_url(base_url, &href)),
            image: None,
        })
    }

    /// Split whole/fraction first, then the combined screen-reader string.
    fn price_and_currency(&self, card: ElementRef<'_>) -> (Option<String>, Option<String>) {
        let combined = self.price_combined.first(card);

        let split = self
            .price_whole
            .first(card)
            .zip(self.price_fraction.first(card))
            .and_then(|(whole, fraction)| join_split_price(&whole, &fraction));

        let price = split.or_else(|| combined.as_deref().and_then(normalize_price));

        let currency = self
            .currency_symbol
            .first(card)
            .or_else(|| combined.as_deref().and_then(currency_from_price_text));

        (price, currency)
    }
}

impl Default for AmazonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RetailerParser for AmazonParser {
    fn family(&self) -> RetailerFamily {
        RetailerFamily::Amazon
    }

    fn schema(&self) -> &'static [ProductField] {
        SCHEMA
    }

    fn parse_products(&self, html: &str, base_url: &str) -> Vec<ProductRecord> {
        parse_cards(RetailerFamily::Amazon, html, &self.cards, |card| {
            self.parse_card(card, base_url)
        })
    }
}
