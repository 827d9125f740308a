//! TTL cache of per-country article lists.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use goodnews_core::{AppConfig, Article, Language};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::NewsError;
use crate::store::CacheStore;

pub const DEFAULT_TTL_SECS: u64 = 3600;
pub const DEFAULT_MAX_ENTRIES: usize = 100;
pub const DEFAULT_EVICT_COUNT: usize = 20;

/// Largest TTL a `chrono::Duration` can hold in whole seconds.
const MAX_TTL_SECS: i64 = i64::MAX / 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub data: Vec<Article>,
    pub written_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Identity of one cached result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    country: String,
    language: Language,
}

impl CacheKey {
    #[must_use]
    pub fn new(country: &str, language: Language) -> Self {
        Self {
            country: country.trim().to_uppercase(),
            language,
        }
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "news:{}:{}", self.country, self.language)
    }
}

/// Sizing and lifetime knobs for a [`NewsCache`].
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub max_entries: usize,
    pub evict_count: usize,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::from_secs(DEFAULT_TTL_SECS, DEFAULT_MAX_ENTRIES, DEFAULT_EVICT_COUNT)
    }
}

impl CachePolicy {
    #[must_use]
    pub fn from_secs(ttl_secs: u64, max_entries: usize, evict_count: usize) -> Self {
        Self {
            ttl: Duration::seconds(
                i64::try_from(ttl_secs).map_or(MAX_TTL_SECS, |s| s.min(MAX_TTL_SECS)),
            ),
            max_entries,
            evict_count,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::from_secs(
            config.cache_ttl_secs,
            config.cache_max_entries,
            config.cache_evict_count,
        )
    }
}

/// Expiring key-value cache over a pluggable [`CacheStore`].
///
/// Every operation holds the store lock for its full duration, so reads,
/// writes and evictions never interleave.
pub struct NewsCache {
    name: &'static str,
    store: Mutex<Box<dyn CacheStore>>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
}

impl fmt::Debug for NewsCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsCache")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl NewsCache {
    #[must_use]
    pub fn new(
        name: &'static str,
        store: Box<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            name,
            store: Mutex::new(store),
            clock,
            policy,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn CacheStore>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Live data for `key`. An expired entry is removed and reported absent.
    pub fn get(&self, key: &CacheKey) -> Option<Vec<Article>> {
        let raw = key.to_string();
        let mut store = self.lock();
        let entry = store.load(&raw)?;
        if self.clock.now() >= entry.expires_at {
            tracing::debug!(cache = self.name, key = %raw, "cache entry expired");
            if let Err(e) = store.remove(&raw) {
                tracing::warn!(
                    cache = self.name,
                    key = %raw,
                    error = %e,
                    "failed to drop expired entry"
                );
            }
            return None;
        }
        Some(entry.data)
    }

    /// Store `data` under `key`, then trim the oldest entries if the store
    /// grew past its limit. Store failures are logged, not returned.
    pub fn set(&self, key: &CacheKey, data: Vec<Article>) {
        let raw = key.to_string();
        let now = self.clock.now();
        let entry = CacheEntry {
            data,
            written_at: now,
            expires_at: now
                .checked_add_signed(self.policy.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        let mut store = self.lock();
        if let Err(e) = store.save(&raw, entry) {
            tracing::warn!(cache = self.name, key = %raw, error = %e, "cache write failed");
            return;
        }

        if store.len() > self.policy.max_entries {
            self.evict_oldest(&mut **store);
        }
    }

    fn evict_oldest(&self, store: &mut dyn CacheStore) {
        let mut entries = store.entries();
        entries.sort_by_key(|(_, entry)| entry.written_at);
        let mut evicted = 0usize;
        for (key, _) in entries.into_iter().take(self.policy.evict_count) {
            match store.remove(&key) {
                Ok(()) => evicted += 1,
                Err(e) => {
                    tracing::warn!(cache = self.name, key = %key, error = %e, "eviction failed");
                }
            }
        }
        tracing::debug!(
            cache = self.name,
            evicted,
            remaining = store.len(),
            "evicted oldest cache entries"
        );
    }

    pub fn delete(&self, key: &CacheKey) {
        let raw = key.to_string();
        if let Err(e) = self.lock().remove(&raw) {
            tracing::warn!(cache = self.name, key = %raw, error = %e, "cache delete failed");
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// # Errors
    ///
    /// Returns an error when the underlying store cannot persist the wipe.
    pub fn clear(&self) -> Result<(), NewsError> {
        self.lock().clear()
    }

    /// Raw stored entries, expired ones included, in key order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, CacheEntry)> {
        self.lock().entries()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use goodnews_core::{ArticleSource, Category};

    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn cache(clock: Arc<ManualClock>) -> NewsCache {
        NewsCache::new(
            "test",
            Box::new(MemoryStore::new()),
            clock,
            CachePolicy::default(),
        )
    }

    fn article(url: &str) -> Article {
        Article {
            title: "Solar park opens".to_string(),
            description: "A milestone".to_string(),
            url: url.to_string(),
            image_url: None,
            published_at: start(),
            source: ArticleSource::new("Le Monde"),
            category: Category::Environment,
        }
    }

    #[test]
    fn key_renders_uppercase_country_and_language() {
        assert_eq!(CacheKey::new("fr", Language::Fr).to_string(), "news:FR:fr");
        assert_eq!(CacheKey::new(" ma ", Language::En).to_string(), "news:MA:en");
    }

    #[test]
    fn set_then_get_returns_data() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(clock);
        let key = CacheKey::new("FR", Language::Fr);
        cache.set(&key, vec![article("https://lemonde.fr/a")]);
        let hit = cache.get(&key).expect("fresh entry is a hit");
        assert_eq!(hit.len(), 1);
    }

    #[test]
    fn empty_list_is_a_hit() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(clock);
        let key = CacheKey::new("FR", Language::Fr);
        cache.set(&key, vec![]);
        assert_eq!(cache.get(&key), Some(vec![]));
    }

    #[test]
    fn entry_expires_at_ttl_and_is_evicted() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(clock.clone());
        let key = CacheKey::new("MA", Language::En);
        cache.set(&key, vec![article("https://example.org/a")]);

        clock.advance(Duration::seconds(3599));
        assert!(cache.get(&key).is_some());

        clock.advance(Duration::seconds(1));
        assert!(cache.get(&key).is_none());
        assert_eq!(cache.len(), 0, "expired entry must be removed on read");

        clock.set(start());
        assert!(cache.get(&key).is_none(), "expired data must not resurrect");
    }

    #[test]
    fn overwrite_replaces_data_and_refreshes_expiry() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(clock.clone());
        let key = CacheKey::new("FR", Language::En);
        cache.set(&key, vec![article("https://a.test/1")]);
        clock.advance(Duration::minutes(50));
        cache.set(&key, vec![article("https://a.test/2")]);
        clock.advance(Duration::minutes(50));
        let hit = cache.get(&key).expect("refreshed entry is live");
        assert_eq!(hit[0].url, "https://a.test/2");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn exceeding_capacity_evicts_twenty_oldest() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(clock.clone());
        for i in 0..101 {
            cache.set(&CacheKey::new(&format!("K{i:03}"), Language::En), vec![]);
            clock.advance(Duration::seconds(1));
        }
        assert_eq!(cache.len(), 81);
        for i in 0..20 {
            let key = CacheKey::new(&format!("K{i:03}"), Language::En);
            assert!(cache.get(&key).is_none(), "K{i:03} should be evicted");
        }
        for i in 20..101 {
            let key = CacheKey::new(&format!("K{i:03}"), Language::En);
            assert!(cache.get(&key).is_some(), "K{i:03} should survive");
        }
    }

    #[test]
    fn delete_and_clear() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(clock);
        let a = CacheKey::new("FR", Language::Fr);
        let b = CacheKey::new("FR", Language::En);
        cache.set(&a, vec![]);
        cache.set(&b, vec![]);
        cache.delete(&a);
        assert!(cache.get(&a).is_none());
        assert_eq!(cache.len(), 1);
        cache.clear().unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn oversized_ttl_saturates_instead_of_overflowing() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = NewsCache::new(
            "test",
            Box::new(MemoryStore::new()),
            clock.clone(),
            CachePolicy::from_secs(9_223_372_036_854_775, 100, 20),
        );
        let key = CacheKey::new("MA", Language::En);
        cache.set(&key, vec![article("https://a.test/1")]);

        let (_, entry) = cache.snapshot().pop().expect("entry stored");
        assert_eq!(entry.expires_at, DateTime::<Utc>::MAX_UTC);

        clock.advance(Duration::days(365 * 100));
        assert_eq!(cache.get(&key).map(|a| a.len()), Some(1));
    }
}
