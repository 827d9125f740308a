//! HTTP client for the NewsAPI REST API.
//!
//! Wraps `reqwest` with NewsAPI-specific error handling, API key management,
//! and typed response deserialization. Quota failures (HTTP 429 / 426 or the
//! matching envelope codes) come back as dedicated error variants so callers
//! can tell them apart from ordinary transport failures.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::NewsApiError;
use crate::types::{Envelope, EverythingQuery, NewsApiArticle};

const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/";
const RATE_LIMITED_MESSAGE: &str =
    "NewsAPI rate limit reached. Free tier allows 100 requests per 24 hours.";
const UPGRADE_REQUIRED_MESSAGE: &str = "This NewsAPI endpoint requires a paid plan.";

/// Client for the NewsAPI `everything` endpoint.
///
/// Use [`NewsApiClient::new`] for production or
/// [`NewsApiClient::with_base_url`] to point at a mock server in tests.
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl NewsApiClient {
    /// Creates a new client pointed at the production NewsAPI.
    ///
    /// # Errors
    ///
    /// Returns [`NewsApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, NewsApiError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`NewsApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`NewsApiError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, NewsApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join("everything")` appends rather
        // than replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|_| NewsApiError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Searches every indexed article, newest first.
    ///
    /// An `ok` envelope with zero articles is a success with an empty `Vec`.
    ///
    /// # Errors
    ///
    /// - [`NewsApiError::RateLimited`] on HTTP 429 or `code: "rateLimited"`.
    /// - [`NewsApiError::UpgradeRequired`] on HTTP 426 or `code: "upgradeRequired"`.
    /// - [`NewsApiError::ApiError`] for any other `status: "error"` envelope.
    /// - [`NewsApiError::Http`] on network failure or other non-2xx status.
    /// - [`NewsApiError::Deserialize`] if a 2xx body is not the expected shape.
    pub async fn search_everything(
        &self,
        query: &EverythingQuery,
    ) -> Result<Vec<NewsApiArticle>, NewsApiError> {
        let url = self.build_everything_url(query)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let status_error = response.error_for_status_ref().err();
        let body = response.text().await?;
        let envelope = serde_json::from_str::<Envelope>(&body);

        if status == StatusCode::TOO_MANY_REQUESTS {
            let message = envelope.ok().and_then(|e| e.message);
            return Err(NewsApiError::RateLimited(
                message.unwrap_or_else(|| RATE_LIMITED_MESSAGE.to_string()),
            ));
        }
        if status == StatusCode::UPGRADE_REQUIRED {
            let message = envelope.ok().and_then(|e| e.message);
            return Err(NewsApiError::UpgradeRequired(
                message.unwrap_or_else(|| UPGRADE_REQUIRED_MESSAGE.to_string()),
            ));
        }

        let envelope = match (envelope, status_error) {
            (Ok(envelope), _) => envelope,
            (Err(_), Some(http_err)) => return Err(NewsApiError::Http(http_err)),
            (Err(e), None) => {
                return Err(NewsApiError::Deserialize {
                    context: "everything".to_string(),
                    source: e,
                })
            }
        };

        Self::check_api_error(&envelope)?;
        tracing::debug!(
            count = envelope.articles.len(),
            "NewsAPI everything returned articles"
        );
        Ok(envelope.articles)
    }

    /// Builds the `everything` URL with properly percent-encoded query parameters.
    fn build_everything_url(&self, query: &EverythingQuery) -> Result<Url, NewsApiError> {
        let mut url = self
            .base_url
            .join("everything")
            .map_err(|_| NewsApiError::InvalidBaseUrl(self.base_url.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &query.q);
            pairs.append_pair("language", &query.language);
            if !query.domains.is_empty() {
                pairs.append_pair("domains", &query.domains.join(","));
            }
            pairs.append_pair("sortBy", "publishedAt");
            pairs.append_pair("pageSize", &query.page_size.min(100).to_string());
            pairs.append_pair("from", &query.from.format("%Y-%m-%dT%H:%M:%S").to_string());
            pairs.append_pair("apiKey", &self.api_key);
        }
        Ok(url)
    }

    /// Maps an `error` envelope to the matching error variant.
    fn check_api_error(envelope: &Envelope) -> Result<(), NewsApiError> {
        if envelope.status != "error" {
            return Ok(());
        }
        let code = envelope.code.clone().unwrap_or_else(|| "unknown".to_string());
        let message = envelope
            .message
            .clone()
            .unwrap_or_else(|| "unknown error".to_string());
        match code.as_str() {
            "rateLimited" => Err(NewsApiError::RateLimited(message)),
            "upgradeRequired" => Err(NewsApiError::UpgradeRequired(message)),
            _ => Err(NewsApiError::ApiError { code, message }),
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
