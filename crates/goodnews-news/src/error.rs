use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("NewsAPI error: {0}")]
    Upstream(#[from] goodnews_newsapi::NewsApiError),

    #[error("cache store I/O error at {path}: {source}")]
    Store {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cache serialization error: {0}")]
    Cache(#[from] serde_json::Error),

    #[error("unexpected response from {url}: HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("invalid server URL: {0}")]
    InvalidServerUrl(String),
}

/// The only failures that cross the aggregator boundary. Every other
/// upstream problem is logged and folded into an empty or fallback result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("RATE_LIMITED: {0}")]
    RateLimited(String),

    #[error("UPGRADE_REQUIRED: {0}")]
    UpgradeRequired(String),
}
