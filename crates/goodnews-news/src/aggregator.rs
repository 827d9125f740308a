//! Request orchestration: cache tiers, primary and secondary sources, and
//! the fallback decisions between them.
//!
//! One request walks a fixed set of states:
//!
//! ```text
//! CacheLookup -> PrimaryFetch -> Filter -> { Return | SecondaryFetch }
//! SecondaryFetch -> { Return | StaticFallback | Empty }
//! ```
//!
//! Whether an empty result is cached follows one rule: it is cached only
//! when every consulted source answered without failing. Quota failures
//! are never cached and surface as [`AggregateError`] when the secondary
//! source has nothing to offer.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use goodnews_core::{AppConfig, Article, Language, RuleSet};
use goodnews_newsapi::NewsApiArticle;

use crate::cache::{CacheKey, NewsCache};
use crate::clock::Clock;
use crate::error::{AggregateError, NewsError};
use crate::fallback::{is_placeholder, mock_articles};
use crate::filter::{filter_primary, is_allow_listed, FilterContext};
use crate::sources::{FetchOutcome, GoogleNewsClient, PrimarySource};

/// Which terminal state produced an [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultPath {
    CacheHit,
    Primary,
    Secondary,
    StaticFallback,
    Empty,
}

impl fmt::Display for ResultPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResultPath::CacheHit => "cache",
            ResultPath::Primary => "primary",
            ResultPath::Secondary => "secondary",
            ResultPath::StaticFallback => "static-fallback",
            ResultPath::Empty => "empty",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub articles: Vec<Article>,
    pub path: ResultPath,
}

#[derive(Debug)]
enum State {
    CacheLookup,
    PrimaryFetch,
    Filter(Vec<NewsApiArticle>),
    SecondaryFetch,
    StaticFallback,
    Empty,
    Return(ResultPath, Vec<Article>),
}

/// Failure bookkeeping carried across states.
#[derive(Debug, Default)]
struct Trail {
    primary_failed: bool,
    secondary_failed: bool,
    quota: Option<AggregateError>,
}

type Gate = Arc<tokio::sync::Mutex<()>>;

pub struct Aggregator {
    tiers: Vec<Arc<NewsCache>>,
    primary: PrimarySource,
    secondary: GoogleNewsClient,
    rules: RuleSet,
    clock: Arc<dyn Clock>,
    in_flight: Mutex<HashMap<CacheKey, Gate>>,
}

impl Aggregator {
    #[must_use]
    pub fn new(
        primary: PrimarySource,
        secondary: GoogleNewsClient,
        rules: RuleSet,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tiers: Vec::new(),
            primary,
            secondary,
            rules,
            clock,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Sources built from configuration, with no cache tiers yet.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError`] if either HTTP client cannot be built or a
    /// configured base URL is invalid.
    pub fn from_config(
        config: &AppConfig,
        rules: RuleSet,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, NewsError> {
        let primary = PrimarySource::from_config(config)?;
        let secondary = GoogleNewsClient::from_config(config)?;
        tracing::info!(
            primary_enabled = primary.is_enabled(),
            rules = rules.len(),
            "aggregator configured"
        );
        Ok(Self::new(primary, secondary, rules, clock))
    }

    /// Append a cache tier. Lookups walk tiers in insertion order; writes
    /// go to every tier.
    #[must_use]
    pub fn with_cache_tier(mut self, tier: Arc<NewsCache>) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Total entries across every tier.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.tiers.iter().map(|t| t.len()).sum()
    }

    /// Positive news for one country and language.
    ///
    /// Concurrent calls for the same key share one upstream fetch: later
    /// callers wait for the first and then read its cached result.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError`] when the primary source is out of quota
    /// and the secondary source produced nothing.
    pub async fn fetch(
        &self,
        country_code: &str,
        language: Language,
    ) -> Result<Outcome, AggregateError> {
        let key = CacheKey::new(country_code, language);
        if let Some(articles) = self.lookup(&key) {
            return Ok(Outcome {
                articles,
                path: ResultPath::CacheHit,
            });
        }

        let gate = self.acquire_gate(&key);
        let result = {
            let _guard = gate.lock().await;
            self.run(&key).await
        };
        self.release_gate(&key, &gate);
        result
    }

    fn acquire_gate(&self, key: &CacheKey) -> Gate {
        let mut map = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry(key.clone()).or_default().clone()
    }

    fn release_gate(&self, key: &CacheKey, gate: &Gate) {
        let mut map = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map plus ours means nobody else is waiting.
        if Arc::strong_count(gate) <= 2 {
            map.remove(key);
        }
    }

    /// First live, non-placeholder entry across the tiers.
    fn lookup(&self, key: &CacheKey) -> Option<Vec<Article>> {
        for tier in &self.tiers {
            let Some(articles) = tier.get(key) else {
                continue;
            };
            if is_placeholder(&articles) {
                tracing::info!(cache = tier.name(), key = %key, "evicting placeholder cache entry");
                tier.delete(key);
                continue;
            }
            tracing::info!(
                cache = tier.name(),
                key = %key,
                count = articles.len(),
                "cache hit"
            );
            return Some(articles);
        }
        None
    }

    fn store(&self, key: &CacheKey, articles: &[Article]) {
        for tier in &self.tiers {
            tier.set(key, articles.to_vec());
        }
    }

    async fn run(&self, key: &CacheKey) -> Result<Outcome, AggregateError> {
        let country = key.country();
        let language = key.language();
        let now = self.clock.now();
        let rule = self.rules.get(country);
        let mut trail = Trail::default();
        let mut state = State::CacheLookup;

        loop {
            tracing::trace!(key = %key, state = ?state, "aggregator state");
            state = match state {
                State::CacheLookup => match self.lookup(key) {
                    Some(articles) => {
                        return Ok(Outcome {
                            articles,
                            path: ResultPath::CacheHit,
                        })
                    }
                    None => State::PrimaryFetch,
                },

                State::PrimaryFetch => match self.primary.fetch(country, language, now).await {
                    Ok(FetchOutcome::Fetched(records)) => State::Filter(records),
                    Ok(FetchOutcome::Unavailable) => {
                        trail.primary_failed = true;
                        State::SecondaryFetch
                    }
                    Err(quota) => {
                        tracing::warn!(
                            key = %key,
                            reason = %quota,
                            "primary quota exhausted; trying secondary"
                        );
                        trail.quota = Some(quota);
                        State::SecondaryFetch
                    }
                },

                State::Filter(records) => {
                    let total = records.len();
                    let ctx = FilterContext {
                        language,
                        rule,
                        now,
                    };
                    let articles = filter_primary(records, &ctx);
                    tracing::info!(
                        key = %key,
                        total,
                        kept = articles.len(),
                        "filtered primary records"
                    );
                    if articles.is_empty() {
                        State::SecondaryFetch
                    } else {
                        State::Return(ResultPath::Primary, articles)
                    }
                }

                State::SecondaryFetch => {
                    let outcome = self.secondary.fetch(country, language, rule, now).await;
                    if outcome.is_unavailable() {
                        trail.secondary_failed = true;
                    }
                    let mut articles = outcome.into_records();
                    if language.is_restricted() {
                        articles.retain(|a| is_allow_listed(&a.url, Some(&a.source.name)));
                    }

                    if !articles.is_empty() {
                        tracing::info!(
                            key = %key,
                            count = articles.len(),
                            "using secondary source"
                        );
                        State::Return(ResultPath::Secondary, articles)
                    } else if let Some(quota) = trail.quota.take() {
                        tracing::warn!(
                            key = %key,
                            reason = %quota,
                            "no fallback results after quota failure"
                        );
                        return Err(quota);
                    } else if trail.primary_failed
                        && trail.secondary_failed
                        && !language.is_restricted()
                    {
                        State::StaticFallback
                    } else {
                        State::Empty
                    }
                }

                State::StaticFallback => {
                    tracing::warn!(key = %key, "every source failed; serving static fallback");
                    State::Return(ResultPath::StaticFallback, mock_articles(country, now))
                }

                State::Empty => {
                    let clean = !trail.primary_failed && !trail.secondary_failed;
                    if clean {
                        tracing::info!(key = %key, "no articles found; caching empty result");
                        self.store(key, &[]);
                    } else {
                        tracing::info!(key = %key, "no articles and a source failed; not caching");
                    }
                    return Ok(Outcome {
                        articles: Vec::new(),
                        path: ResultPath::Empty,
                    });
                }

                State::Return(path, articles) => {
                    self.store(key, &articles);
                    tracing::info!(
                        key = %key,
                        path = %path,
                        count = articles.len(),
                        "cached and returning articles"
                    );
                    return Ok(Outcome { articles, path });
                }
            };
        }
    }
}

impl fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator")
            .field("tiers", &self.tiers)
            .field("primary_enabled", &self.primary.is_enabled())
            .field("secondary", &self.secondary)
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}
