use std::time::Duration;

use reqwest::{Client, Url};
use shelfscan_core::{RawPage, RetailerFamily, RetailerId};

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

use super::{FetchRequest, PageSource};

/// Fetches retailer search-result pages over HTTP.
///
/// Pages `1..=max_pages` are requested one after another with a fixed pause
/// between requests. Transient failures (429, network errors) are retried with
/// exponential backoff; a page that still fails is logged and skipped, so the
/// run continues with whatever pages did arrive.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    inter_request_delay: Duration,
    max_retries: u32,
    backoff_base_secs: u64,
    /// Replaces the retailer's scheme and host; used to point at a local server.
    origin_override: Option<String>,
}

impl HttpPageSource {
    /// Creates a source with the given timeout, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            inter_request_delay: Duration::ZERO,
            max_retries,
            backoff_base_secs,
            origin_override: None,
        })
    }

    #[must_use]
    pub fn with_inter_request_delay(mut self, delay: Duration) -> Self {
        self.inter_request_delay = delay;
        self
    }

    /// Sends every request to `origin` (e.g. `http://127.0.0.1:5000`) instead
    /// of the retailer's own host. Paths and query strings are unchanged.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin_override = Some(origin.into());
        self
    }

    /// Search URL for one results page.
    ///
    /// Amazon: `https://{domain}/s?k={term}&page={n}`.
    /// Meds and Apotea: `https://www.{domain}/sok?q={term}&page={n}`.
    /// Spaces in the term are encoded as `+`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSearchUrl`] if the origin does not parse.
    pub fn search_url(
        &self,
        retailer: RetailerId,
        search_term: &str,
        page: u32,
    ) -> Result<Url, ScraperError> {
        let (default_origin, path, term_param) = match retailer.family() {
            RetailerFamily::Amazon => (format!("https://{}", retailer.domain()), "/s", "k"),
            RetailerFamily::Meds | RetailerFamily::Apotea => {
                (format!("https://www.{}", retailer.domain()), "/sok", "q")
            }
        };
        let origin = self.origin_override.as_deref().unwrap_or(&default_origin);

        let mut url = Url::parse(origin).map_err(|e| ScraperError::InvalidSearchUrl {
            retailer: retailer.to_string(),
            reason: e.to_string(),
        })?;
        url.set_path(path);
        url.query_pairs_mut()
            .append_pair(term_param, search_term)
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    async fn fetch_html(&self, url: &Url) -> Result<String, ScraperError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(0);
            return Err(ScraperError::RateLimited {
                domain: url.host_str().unwrap_or_default().to_owned(),
                retry_after_secs,
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

impl PageSource for HttpPageSource {
    async fn fetch_pages(&self, request: &FetchRequest) -> Result<Vec<RawPage>, ScraperError> {
        let retailer = request.profile.retailer;
        let mut pages = Vec::new();

        for page_number in 1..=request.max_pages {
            let url = self.search_url(retailer, &request.search_term, page_number)?;

            if page_number > 1 && !self.inter_request_delay.is_zero() {
                tokio::time::sleep(self.inter_request_delay).await;
            }

            tracing::info!(%retailer, page = page_number, %url, "fetching search page");
            let fetched = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
                self.fetch_html(&url)
            })
            .await;

            match fetched {
                Ok(html) => {
                    pages.push(RawPage::new(page_number, html).with_source_url(url.as_str()));
                }
                Err(e) => {
                    tracing::warn!(
                        %retailer,
                        page = page_number,
                        error = %e,
                        "page fetch failed; skipping"
                    );
                }
            }
        }

        tracing::info!(
            %retailer,
            requested = request.max_pages,
            fetched = pages.len(),
            "fetch complete"
        );
        Ok(pages)
    }
}
