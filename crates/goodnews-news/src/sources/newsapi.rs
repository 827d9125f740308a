//! Primary source: NewsAPI `everything` search.

use chrono::{DateTime, Utc};
use goodnews_core::{country_name, AppConfig, Language};
use goodnews_newsapi::{EverythingQuery, NewsApiArticle, NewsApiClient, NewsApiError};

use super::FetchOutcome;
use crate::error::{AggregateError, NewsError};
use crate::filter::{FRENCH_DOMAINS, RECENCY_WINDOW_DAYS};

const PAGE_SIZE: u32 = 50;

/// Topic terms OR-ed into the English query so the upstream pre-selects
/// the kind of stories the classifier keeps.
const TOPIC_TERMS: &[&str] = &[
    "technology",
    "innovation",
    "startup",
    "environment",
    "climate",
    "renewable",
    "culture",
    "art",
    "music",
    "festival",
    "politics",
    "government",
    "history",
    "archaeology",
    "discovery",
    "mulesoft",
    "\"sap commerce\"",
    "\"french tech\"",
];

/// Build the upstream query for one country and language.
///
/// English searches the country name combined with the topic terms.
/// French searches the bare country name restricted to the French
/// publisher allow-list.
#[must_use]
pub fn build_primary_query(
    country: &str,
    language: Language,
    now: DateTime<Utc>,
) -> EverythingQuery {
    let (q, domains) = match language {
        Language::En => (format!("{country} AND ({})", TOPIC_TERMS.join(" OR ")), Vec::new()),
        Language::Fr => (
            country.to_string(),
            FRENCH_DOMAINS.iter().map(|d| (*d).to_string()).collect(),
        ),
    };
    EverythingQuery {
        q,
        language: language.code().to_string(),
        domains,
        from: now - chrono::Duration::days(RECENCY_WINDOW_DAYS),
        page_size: PAGE_SIZE,
    }
}

/// Wrapper that turns client errors into the aggregator's vocabulary:
/// quota problems propagate, everything else becomes `Unavailable`.
pub struct PrimarySource {
    client: Option<NewsApiClient>,
}

impl PrimarySource {
    #[must_use]
    pub fn new(client: NewsApiClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// A primary source with no API key. Every fetch reports `Unavailable`.
    #[must_use]
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// # Errors
    ///
    /// Returns [`NewsError::Upstream`] if the HTTP client cannot be built or
    /// the configured base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, NewsError> {
        let Some(key) = config.newsapi_api_key.as_deref() else {
            tracing::warn!("NEWSAPI_API_KEY not set; primary source disabled");
            return Ok(Self::disabled());
        };
        let client = NewsApiClient::with_base_url(
            key,
            config.upstream_timeout_secs,
            &config.user_agent,
            &config.newsapi_base_url,
        )?;
        Ok(Self::new(client))
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// # Errors
    ///
    /// Returns [`AggregateError::RateLimited`] or
    /// [`AggregateError::UpgradeRequired`] when the upstream quota is the
    /// reason for failure. Every other failure is logged and reported as
    /// [`FetchOutcome::Unavailable`].
    pub async fn fetch(
        &self,
        country_code: &str,
        language: Language,
        now: DateTime<Utc>,
    ) -> Result<FetchOutcome<NewsApiArticle>, AggregateError> {
        let Some(client) = self.client.as_ref() else {
            tracing::debug!(country = %country_code, "primary source disabled");
            return Ok(FetchOutcome::Unavailable);
        };

        let query = build_primary_query(&country_name(country_code), language, now);
        match client.search_everything(&query).await {
            Ok(records) => {
                tracing::info!(
                    country = %country_code,
                    language = %language,
                    count = records.len(),
                    "primary source returned records"
                );
                Ok(FetchOutcome::Fetched(records))
            }
            Err(NewsApiError::RateLimited(message)) => {
                tracing::warn!(country = %country_code, %message, "primary source rate limited");
                Err(AggregateError::RateLimited(message))
            }
            Err(NewsApiError::UpgradeRequired(message)) => {
                tracing::warn!(
                    country = %country_code,
                    %message,
                    "primary source requires upgrade"
                );
                Err(AggregateError::UpgradeRequired(message))
            }
            Err(e) => {
                tracing::warn!(
                    country = %country_code,
                    source = "newsapi",
                    error = %e,
                    "primary source fetch failed"
                );
                Ok(FetchOutcome::Unavailable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 8, 12, 0, 0).unwrap()
    }

    #[test]
    fn english_query_combines_country_and_topics() {
        let q = build_primary_query("morocco", Language::En, now());
        assert!(q.q.starts_with("morocco AND (technology OR innovation"));
        assert!(q.q.ends_with("OR \"sap commerce\" OR \"french tech\")"));
        assert_eq!(q.language, "en");
        assert!(q.domains.is_empty());
        assert_eq!(q.page_size, 50);
        assert_eq!(q.from, now() - chrono::Duration::days(7));
    }

    #[test]
    fn french_query_uses_every_allow_listed_domain() {
        let q = build_primary_query("morocco", Language::Fr, now());
        assert_eq!(q.q, "morocco");
        assert_eq!(q.language, "fr");
        assert_eq!(q.domains.len(), 23);
        assert!(q.domains.iter().any(|d| d == "lemonde.fr"));
    }

    #[tokio::test]
    async fn disabled_source_is_unavailable() {
        let source = PrimarySource::disabled();
        assert!(!source.is_enabled());
        let outcome = source.fetch("FR", Language::Fr, now()).await.unwrap();
        assert!(outcome.is_unavailable());
    }
}
