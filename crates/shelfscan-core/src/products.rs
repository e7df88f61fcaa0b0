use serde::{Deserialize, Serialize};

/// One fetched search-results document, tagged with its page number.
///
/// Produced by a page source and handed to the extraction stage read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPage {
    /// 1-based page number as requested from the retailer.
    pub page_number: u32,
    /// URL the page was fetched from, when the source knows it.
    #[serde(default)]
    pub source_url: Option<String>,
    pub html: String,
}

impl RawPage {
    #[must_use]
    pub fn new(page_number: u32, html: impl Into<String>) -> Self {
        Self {
            page_number,
            source_url: None,
            html: html.into(),
        }
    }

    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }
}

/// A product listing extracted from a search-results card, normalized to the
/// retailer-agnostic schema.
///
/// `title` is the only required field: cards without one are never turned
/// into records. `link` and `image` are always absolute URLs when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductRecord {
    pub title: String,
    /// Decimal string with `.` as the separator, e.g. `"1299.00"`.
    pub price: Option<String>,
    /// Currency symbol (`"$"`, `"€"`) or ISO code (`"SEK"`).
    pub currency: Option<String>,
    /// Numeric rating only, e.g. `"4.5"`.
    pub rating: Option<String>,
    /// Review count as plain digits, e.g. `"12034"`.
    pub reviews_count: Option<String>,
    pub pack_size: Option<String>,
    /// Absolute product URL. Used as the default dedup key.
    pub link: Option<String>,
    pub image: Option<String>,
}

impl ProductRecord {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Returns the value of `field` for this record, if present.
    #[must_use]
    pub fn field(&self, field: ProductField) -> Option<&str> {
        match field {
            ProductField::Title => Some(self.title.as_str()),
            ProductField::Price => self.price.as_deref(),
            ProductField::Currency => self.currency.as_deref(),
            ProductField::Rating => self.rating.as_deref(),
            ProductField::ReviewsCount => self.reviews_count.as_deref(),
            ProductField::PackSize => self.pack_size.as_deref(),
            ProductField::Link => self.link.as_deref(),
            ProductField::Image => self.image.as_deref(),
        }
    }
}

/// A column of the product schema. Each retailer parser exposes the ordered
/// subset of fields it can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductField {
    Title,
    Price,
    Currency,
    Rating,
    ReviewsCount,
    PackSize,
    Link,
    Image,
}

impl ProductField {
    /// Column header used in exported tables.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            ProductField::Title => "Title",
            ProductField::Price => "Price",
            ProductField::Currency => "Currency",
            ProductField::Rating => "Rating",
            ProductField::ReviewsCount => "ReviewsCount",
            ProductField::PackSize => "PackSize",
            ProductField::Link => "Link",
            ProductField::Image => "Image",
        }
    }
}

impl std::fmt::Display for ProductField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}
