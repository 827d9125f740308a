//! News command handlers: in-process pipeline, remote server, country table.

use std::sync::Arc;

use goodnews_core::{known_countries, load_rules, AppConfig, Article, Language, RuleSet};
use goodnews_news::{
    Aggregator, CachePolicy, Clock, FileStore, MemoryStore, NewsCache, RemoteNewsClient,
    SystemClock,
};

/// Persistent client cache at the configured path.
pub(crate) fn client_cache(config: &AppConfig, clock: Arc<dyn Clock>) -> NewsCache {
    NewsCache::new(
        "client",
        Box::new(FileStore::open(&config.client_cache_path)),
        clock,
        CachePolicy::from_config(config),
    )
}

fn rule_set(config: &AppConfig) -> anyhow::Result<RuleSet> {
    Ok(match config.rules_path.as_deref() {
        Some(path) => RuleSet::with_overrides(load_rules(path)?),
        None => RuleSet::builtin(),
    })
}

/// Run the aggregator in-process with the persistent tier in front of an
/// in-memory tier.
///
/// # Errors
///
/// Returns an error if the sources cannot be configured or the primary
/// source is out of quota with nothing to fall back on.
pub(crate) async fn run_fetch(
    config: &AppConfig,
    country: &str,
    language: Language,
    json: bool,
) -> anyhow::Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let memory = NewsCache::new(
        "memory",
        Box::new(MemoryStore::new()),
        Arc::clone(&clock),
        CachePolicy::from_config(config),
    );
    let aggregator = Aggregator::from_config(config, rule_set(config)?, Arc::clone(&clock))?
        .with_cache_tier(Arc::new(client_cache(config, clock)))
        .with_cache_tier(Arc::new(memory));

    let outcome = aggregator.fetch(country, language).await?;
    tracing::info!(country, %language, path = %outcome.path, "fetch complete");
    print_articles(&outcome.articles, country, language, json)
}

/// Query a running server through the remote client.
///
/// # Errors
///
/// Returns an error if the server URL is invalid.
pub(crate) async fn run_remote(
    config: &AppConfig,
    server_url: &str,
    country: &str,
    language: Language,
    json: bool,
) -> anyhow::Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let client = RemoteNewsClient::new(
        server_url,
        client_cache(config, Arc::clone(&clock)),
        clock,
        config.upstream_timeout_secs,
        &config.user_agent,
    )?;

    let outcome = client.fetch(country, language).await;
    tracing::info!(country, %language, path = %outcome.path, "remote fetch complete");
    print_articles(&outcome.articles, country, language, json)
}

pub(crate) fn run_countries() {
    let rules = RuleSet::builtin();
    println!("{:<6}{:<32}NOTES", "CODE", "NAME");
    for (code, name) in known_countries() {
        let notes = if rules.get(code).is_some() {
            "disambiguated"
        } else {
            ""
        };
        println!("{code:<6}{name:<32}{notes}");
    }
}

fn print_articles(
    articles: &[Article],
    country: &str,
    language: Language,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(articles)?);
        return Ok(());
    }

    if articles.is_empty() {
        println!(
            "no articles found for {} ({language})",
            country.trim().to_uppercase()
        );
        return Ok(());
    }

    println!("{:<18}{:<22}{:<22}TITLE", "PUBLISHED", "SOURCE", "CATEGORY");
    for article in articles {
        println!("{}", article_row(article));
    }
    Ok(())
}

pub(crate) fn article_row(article: &Article) -> String {
    let published = article.published_at.format("%Y-%m-%d %H:%M").to_string();
    format!(
        "{:<18}{:<22}{:<22}{}",
        published,
        clip(&article.source.name, 20),
        article.category.to_string(),
        article.title
    )
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
