use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid search URL for {retailer}: {reason}")]
    InvalidSearchUrl { retailer: String, reason: String },

    #[error("could not read page feed {path}: {source}")]
    FeedIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("page feed {path} is not valid JSON: {source}")]
    FeedParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
