//! Where raw search-result pages come from.
//!
//! The pipeline only sees the [`PageSource`] trait. Two implementations ship:
//! [`FeedFilePageSource`] replays a JSON feed written by an earlier crawl, and
//! [`HttpPageSource`] fetches the retailer's search pages live.

mod feed;
mod http;

use std::future::Future;

use shelfscan_core::{RawPage, RetailerProfile};

use crate::error::ScraperError;

pub use feed::FeedFilePageSource;
pub use http::HttpPageSource;

/// What to fetch for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub profile: RetailerProfile,
    pub search_term: String,
    /// Upper bound on pages returned. Sources may return fewer.
    pub max_pages: u32,
}

/// Produces the ordered pages of one search.
///
/// An empty `Vec` is a valid answer (nothing fetched) and is not an error.
pub trait PageSource {
    /// # Errors
    ///
    /// Returns a [`ScraperError`] when the source as a whole is unusable
    /// (feed file missing or malformed, search URL cannot be built).
    fn fetch_pages(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<Vec<RawPage>, ScraperError>> + Send;
}
