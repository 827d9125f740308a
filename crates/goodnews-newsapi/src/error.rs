use thiserror::Error;

/// Errors returned by the NewsAPI client.
#[derive(Debug, Error)]
pub enum NewsApiError {
    /// Network or TLS failure, or a non-2xx status without a quota meaning.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Daily request quota exhausted (HTTP 429 or `code: "rateLimited"`).
    #[error("NewsAPI rate limited: {0}")]
    RateLimited(String),

    /// The endpoint or parameters require a paid plan (HTTP 426).
    #[error("NewsAPI upgrade required: {0}")]
    UpgradeRequired(String),

    /// The API returned `"status": "error"` for another reason.
    #[error("NewsAPI error ({code}): {message}")]
    ApiError { code: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

