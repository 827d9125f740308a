use thiserror::Error;

use crate::app_config::{AppConfig, Environment};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read rules file {path}: {source}")]
    RulesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules file: {0}")]
    RulesFileParse(#[from] serde_yaml::Error),

    #[error("invalid disambiguation rule: {0}")]
    InvalidRule(String),
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a pure
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("GOODNEWS_ENV", "development"))?;
    let bind_addr = parse_addr("GOODNEWS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("GOODNEWS_LOG_LEVEL", "info");

    let newsapi_api_key = optional("NEWSAPI_API_KEY");
    let newsapi_base_url = or_default("NEWSAPI_BASE_URL", "https://newsapi.org/v2/");
    let google_news_url = or_default(
        "GOODNEWS_GOOGLE_NEWS_URL",
        "https://news.google.com/rss/search",
    );
    let upstream_timeout_secs = parse_u64("GOODNEWS_UPSTREAM_TIMEOUT_SECS", "10")?;
    if upstream_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "GOODNEWS_UPSTREAM_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default(
        "GOODNEWS_USER_AGENT",
        "goodnews/0.1 (positive-news-aggregator)",
    );

    let cache_ttl_secs = parse_u64("GOODNEWS_CACHE_TTL_SECS", "3600")?;
    let cache_max_entries = parse_usize("GOODNEWS_CACHE_MAX_ENTRIES", "100")?;
    let cache_evict_count = parse_usize("GOODNEWS_CACHE_EVICT_COUNT", "20")?;

    let rules_path = optional("GOODNEWS_RULES_PATH").map(PathBuf::from);
    let client_cache_path = PathBuf::from(or_default(
        "GOODNEWS_CLIENT_CACHE_PATH",
        "./.goodnews-cache.json",
    ));
    let server_url = or_default("GOODNEWS_SERVER_URL", "http://127.0.0.1:3000");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        newsapi_api_key,
        newsapi_base_url,
        google_news_url,
        upstream_timeout_secs,
        user_agent,
        cache_ttl_secs,
        cache_max_entries,
        cache_evict_count,
        rules_path,
        client_cache_path,
        server_url,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GOODNEWS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
