//! Client for a running news server, with its own persistent cache.
//!
//! The client never fails: when the server cannot help, English requests
//! get the static fallback set and French requests get an empty list.
//! Every answer, including those two, is cached.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use goodnews_core::{Article, Language};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::cache::{CacheKey, NewsCache};
use crate::clock::Clock;
use crate::error::NewsError;
use crate::fallback::mock_articles;

/// Where a [`RemoteNewsClient`] answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemotePath {
    Cache,
    Server,
    StaticFallback,
    Empty,
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RemotePath::Cache => "cache",
            RemotePath::Server => "server",
            RemotePath::StaticFallback => "static-fallback",
            RemotePath::Empty => "empty",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutcome {
    pub articles: Vec<Article>,
    pub path: RemotePath,
}

enum ServerReply {
    Articles(Vec<Article>),
    RateLimited,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

pub struct RemoteNewsClient {
    client: Client,
    endpoint: Url,
    cache: NewsCache,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for RemoteNewsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteNewsClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl RemoteNewsClient {
    /// # Errors
    ///
    /// Returns [`NewsError::InvalidServerUrl`] if `server_url` does not
    /// parse, or [`NewsError::Http`] if the HTTP client cannot be built.
    pub fn new(
        server_url: &str,
        cache: NewsCache,
        clock: Arc<dyn Clock>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, NewsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        let normalized = format!("{}/", server_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalized)
            .and_then(|base| base.join("api/news"))
            .map_err(|e| NewsError::InvalidServerUrl(format!("{server_url}: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            cache,
            clock,
        })
    }

    #[must_use]
    pub fn cache(&self) -> &NewsCache {
        &self.cache
    }

    fn request_url(&self, key: &CacheKey) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("country", key.country())
            .append_pair("language", key.language().code());
        url
    }

    async fn request(&self, key: &CacheKey) -> Result<ServerReply, NewsError> {
        let url = self.request_url(key);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(ServerReply::Articles(response.json().await?));
        }

        let body: Option<ErrorBody> = response.json().await.ok();
        let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
            || body.and_then(|b| b.error).as_deref() == Some("RATE_LIMITED");
        if rate_limited {
            return Ok(ServerReply::RateLimited);
        }
        Err(NewsError::UnexpectedStatus {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }

    fn fallback(&self, key: &CacheKey) -> RemoteOutcome {
        match key.language() {
            Language::En => RemoteOutcome {
                articles: mock_articles(key.country(), self.clock.now()),
                path: RemotePath::StaticFallback,
            },
            Language::Fr => RemoteOutcome {
                articles: Vec::new(),
                path: RemotePath::Empty,
            },
        }
    }

    /// Positive news for one country and language.
    pub async fn fetch(&self, country_code: &str, language: Language) -> RemoteOutcome {
        let key = CacheKey::new(country_code, language);
        if let Some(articles) = self.cache.get(&key) {
            tracing::info!(key = %key, count = articles.len(), "client cache hit");
            return RemoteOutcome {
                articles,
                path: RemotePath::Cache,
            };
        }

        let outcome = match self.request(&key).await {
            Ok(ServerReply::Articles(articles)) if !articles.is_empty() => RemoteOutcome {
                articles,
                path: RemotePath::Server,
            },
            Ok(ServerReply::Articles(_)) => {
                tracing::info!(key = %key, "server returned no articles");
                self.fallback(&key)
            }
            Ok(ServerReply::RateLimited) => {
                tracing::warn!(key = %key, "server rate limited; using static fallback");
                RemoteOutcome {
                    articles: mock_articles(key.country(), self.clock.now()),
                    path: RemotePath::StaticFallback,
                }
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "news server request failed");
                self.fallback(&key)
            }
        };

        self.cache.set(&key, outcome.articles.clone());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachePolicy;
    use crate::clock::SystemClock;
    use crate::store::MemoryStore;

    fn client(server_url: &str) -> Result<RemoteNewsClient, NewsError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache = NewsCache::new(
            "client",
            Box::new(MemoryStore::new()),
            clock.clone(),
            CachePolicy::default(),
        );
        RemoteNewsClient::new(server_url, cache, clock, 5, "goodnews-test")
    }

    #[test]
    fn request_url_targets_news_endpoint() {
        let c = client("http://127.0.0.1:3000").unwrap();
        let url = c.request_url(&CacheKey::new("fr", Language::Fr));
        assert_eq!(url.as_str(), "http://127.0.0.1:3000/api/news?country=FR&language=fr");

        let c = client("http://proxy.test/goodnews/").unwrap();
        let url = c.request_url(&CacheKey::new("MA", Language::En));
        assert_eq!(url.as_str(), "http://proxy.test/goodnews/api/news?country=MA&language=en");
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        assert!(matches!(client("not a url"), Err(NewsError::InvalidServerUrl(_))));
    }
}
