//! Search-result scraping: retailer parsers, field normalization, extraction,
//! deduplication and the page sources that feed them.

pub mod dedup;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod parsers;
mod rate_limit;
mod selectors;
pub mod source;

pub use dedup::{dedup_by_key, dedup_by_link, link_key, DedupKey};
pub use error::ScraperError;
pub use extract::{
    extract_pages, extract_pages_parallel, extract_pages_with_summary, ExtractionSummary,
};
pub use parsers::{parser_for, AmazonParser, ApoteaParser, MedsParser, RetailerParser};
pub use source::{FeedFilePageSource, FetchRequest, HttpPageSource, PageSource};
