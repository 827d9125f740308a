//! Secondary source: Google News RSS search feed.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use goodnews_core::{country_name, AppConfig, Article, ArticleSource, DisambiguationRule, Language};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use super::attribution::{extract_image, infer_source_name};
use super::rss_helpers::{parse_rss_items, strip_html, truncate_chars, RssItem};
use super::FetchOutcome;
use crate::classifier::{categorize, has_negative};
use crate::error::NewsError;
use crate::filter::{sort_and_truncate, RECENCY_WINDOW_DAYS};

const DEFAULT_BASE_URL: &str = "https://news.google.com/rss/search";
const MAX_FEED_ITEMS: usize = 30;
const SNIPPET_CHARS: usize = 200;

/// Fetches and filters the public search feed.
#[derive(Debug, Clone)]
pub struct GoogleNewsClient {
    client: Client,
    base_url: String,
}

impl GoogleNewsClient {
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, NewsError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

    /// Point the client at a different feed endpoint (tests, mirrors).
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, NewsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches(['/', '?']).to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, NewsError> {
        Self::with_base_url(
            &config.google_news_url,
            config.upstream_timeout_secs,
            &config.user_agent,
        )
    }

    /// Search feed URL for `query`, scoped to the last 7 days and to the
    /// locale matching `language`.
    #[must_use]
    pub fn feed_url(&self, query: &str, language: Language) -> String {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC);
        let locale = match language {
            Language::Fr => "hl=fr&gl=FR&ceid=FR:fr",
            Language::En => "hl=en&gl=US&ceid=US:en",
        };
        format!("{}?q={encoded}&{locale}&when=7d", self.base_url)
    }

    async fn fetch_items(&self, url: &str) -> Result<Vec<RssItem>, NewsError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        parse_rss_items(&body, MAX_FEED_ITEMS)
    }

    /// Fetch, filter and normalize feed items for one country.
    ///
    /// Never fails: transport and parse errors are logged and reported as
    /// [`FetchOutcome::Unavailable`].
    pub async fn fetch(
        &self,
        country_code: &str,
        language: Language,
        rule: Option<&DisambiguationRule>,
        now: DateTime<Utc>,
    ) -> FetchOutcome<Article> {
        let query = rule
            .and_then(|r| r.search_query.clone())
            .unwrap_or_else(|| country_name(country_code));
        let url = self.feed_url(&query, language);
        tracing::debug!(country = %country_code, url = %url, "fetching secondary feed");

        match self.fetch_items(&url).await {
            Ok(items) => {
                let fetched = items.len();
                let articles = select_articles(items, language, rule, now);
                tracing::info!(
                    country = %country_code,
                    language = %language,
                    fetched,
                    kept = articles.len(),
                    "secondary source returned articles"
                );
                FetchOutcome::Fetched(articles)
            }
            Err(e) => {
                tracing::warn!(
                    country = %country_code,
                    source = "google_news_rss",
                    error = %e,
                    "secondary source fetch failed"
                );
                FetchOutcome::Unavailable
            }
        }
    }
}

/// Turn raw feed items into at most 8 articles, newest first.
pub(crate) fn select_articles(
    items: Vec<RssItem>,
    language: Language,
    rule: Option<&DisambiguationRule>,
    now: DateTime<Utc>,
) -> Vec<Article> {
    let cutoff = now - chrono::Duration::days(RECENCY_WINDOW_DAYS);
    let mut seen = HashSet::new();
    let mut articles = Vec::new();

    for item in items.into_iter().take(MAX_FEED_ITEMS) {
        if item.title.is_empty() || item.link.is_empty() {
            tracing::debug!(title = %item.title, "dropped feed item without title or link");
            continue;
        }
        if !seen.insert(item.link.clone()) {
            continue;
        }

        let Ok(published) = DateTime::parse_from_rfc2822(&item.pub_date) else {
            tracing::debug!(
                title = %item.title,
                pub_date = %item.pub_date,
                "dropped feed item with bad date"
            );
            continue;
        };
        let published_at = published.with_timezone(&Utc);
        if published_at < cutoff || published_at > now {
            tracing::debug!(title = %item.title, %published_at, "dropped feed item outside window");
            continue;
        }

        let content_text = strip_html(&item.content);
        let mut snippet = truncate_chars(&strip_html(&item.description), SNIPPET_CHARS);
        if snippet.is_empty() {
            snippet = truncate_chars(&content_text, SNIPPET_CHARS);
        }
        if snippet.is_empty() {
            tracing::debug!(title = %item.title, "dropped feed item without description");
            continue;
        }
        let text = format!("{} {snippet}", item.title);

        if let Some(rule) = rule {
            if !rule.is_on_topic(&text) {
                tracing::debug!(
                    title = %item.title,
                    country = %rule.country,
                    "dropped off-topic feed item"
                );
                continue;
            }
        }
        if has_negative(&item.title, &snippet) {
            tracing::debug!(title = %item.title, "dropped negative feed item");
            continue;
        }

        let markup = if item.content.is_empty() {
            &item.description
        } else {
            &item.content
        };
        let image_url = extract_image(markup);
        let source_name = infer_source_name(
            &format!("{text} {content_text}"),
            &item.source_name,
            &item.source_url,
            &item.link,
        );
        let category = categorize(&item.title, &snippet, language);

        articles.push(Article {
            title: item.title,
            description: snippet,
            url: item.link,
            image_url,
            published_at,
            source: ArticleSource::new(source_name),
            category,
        });
    }

    sort_and_truncate(articles)
}
