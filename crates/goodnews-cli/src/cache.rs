//! Persistent client cache inspection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use goodnews_core::AppConfig;
use goodnews_news::{CacheEntry, Clock, SystemClock};

use crate::news::client_cache;

pub(crate) fn run_cache_show(config: &AppConfig) {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let now = clock.now();
    let entries = client_cache(config, clock).snapshot();

    if entries.is_empty() {
        println!(
            "client cache at {} is empty",
            config.client_cache_path.display()
        );
        return;
    }

    println!("{:<16}{:<10}{:<18}STATUS", "KEY", "ARTICLES", "EXPIRES");
    for (key, entry) in &entries {
        println!("{}", entry_row(key, entry, now));
    }
}

/// # Errors
///
/// Returns an error if the emptied cache cannot be written back to disk.
pub(crate) fn run_cache_clear(config: &AppConfig) -> anyhow::Result<()> {
    let cache = client_cache(config, Arc::new(SystemClock));
    let removed = cache.len();
    cache.clear()?;
    println!(
        "removed {removed} entries from {}",
        config.client_cache_path.display()
    );
    Ok(())
}

pub(crate) fn entry_row(key: &str, entry: &CacheEntry, now: DateTime<Utc>) -> String {
    let status = if now >= entry.expires_at {
        "expired"
    } else {
        "live"
    };
    format!(
        "{:<16}{:<10}{:<18}{}",
        key,
        entry.data.len(),
        entry.expires_at.format("%Y-%m-%d %H:%M").to_string(),
        status
    )
}
