use std::path::PathBuf;

use serde::Deserialize;
use shelfscan_core::RawPage;

use crate::error::ScraperError;

use super::{FetchRequest, PageSource};

/// Replays pages from a JSON feed file:
/// `[{"page_number": "1", "html": "<html>…", "url": "https://…"}, …]`.
///
/// `page_number` may be a string or an integer; when it is absent or not a
/// usable page number the entry's 1-based position is used. Pages are
/// returned in page-number order regardless of their order in the file,
/// since the crawler writes them as downloads finish. `url` is optional and
/// may also be spelled `source_url`.
#[derive(Debug, Clone)]
pub struct FeedFilePageSource {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    #[serde(default)]
    page_number: Option<FeedPageNumber>,
    html: String,
    #[serde(default, alias = "source_url")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedPageNumber {
    Number(u32),
    Text(String),
    Other(serde_json::Value),
}

impl FeedPageNumber {
    fn resolve(&self) -> Option<u32> {
        match self {
            FeedPageNumber::Number(n) => Some(*n),
            FeedPageNumber::Text(s) => s.trim().parse().ok(),
            FeedPageNumber::Other(_) => None,
        }
    }
}

impl FeedFilePageSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parses feed JSON into pages ordered by page number, keeping the first
    /// `max_pages`.
    fn parse_feed(&self, json: &str, max_pages: u32) -> Result<Vec<RawPage>, ScraperError> {
        let entries: Vec<FeedEntry> =
            serde_json::from_str(json).map_err(|source| ScraperError::FeedParse {
                path: self.path.display().to_string(),
                source,
            })?;

        let mut pages: Vec<RawPage> = entries
            .into_iter()
            .zip(1u32..)
            .map(|(entry, position)| {
                let page_number = entry
                    .page_number
                    .as_ref()
                    .and_then(FeedPageNumber::resolve)
                    .unwrap_or(position);
                let page = RawPage::new(page_number, entry.html);
                match entry.url {
                    Some(url) => page.with_source_url(url),
                    None => page,
                }
            })
            .collect();

        // Stable, so entries sharing a page number keep their file order.
        pages.sort_by_key(|page| page.page_number);
        pages.truncate(usize::try_from(max_pages).unwrap_or(usize::MAX));
        Ok(pages)
    }
}

impl PageSource for FeedFilePageSource {
    async fn fetch_pages(&self, request: &FetchRequest) -> Result<Vec<RawPage>, ScraperError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ScraperError::FeedIo {
                path: self.path.display().to_string(),
                source,
            })?;

        let pages = self.parse_feed(&json, request.max_pages)?;
        tracing::info!(
            path = %self.path.display(),
            retailer = %request.profile.retailer,
            pages = pages.len(),
            "loaded pages from feed"
        );
        Ok(pages)
    }
}
