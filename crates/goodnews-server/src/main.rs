mod api;
mod middleware;

use std::sync::Arc;

use goodnews_core::{load_rules, AppConfig, RuleSet};
use goodnews_news::{Aggregator, CachePolicy, Clock, MemoryStore, NewsCache, SystemClock};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = goodnews_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting goodnews server");

    let aggregator = build_aggregator(&config)?;
    let app = build_app(AppState::new(aggregator));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Aggregator with a single in-memory cache tier.
fn build_aggregator(config: &AppConfig) -> anyhow::Result<Aggregator> {
    let rules = match config.rules_path.as_deref() {
        Some(path) => RuleSet::with_overrides(load_rules(path)?),
        None => RuleSet::builtin(),
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let memory = NewsCache::new(
        "server",
        Box::new(MemoryStore::new()),
        Arc::clone(&clock),
        CachePolicy::from_config(config),
    );
    Ok(Aggregator::from_config(config, rules, clock)?.with_cache_tier(Arc::new(memory)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
