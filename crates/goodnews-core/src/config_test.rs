use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "GOODNEWS_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.newsapi_api_key.is_none());
    assert_eq!(cfg.newsapi_base_url, "https://newsapi.org/v2/");
    assert_eq!(cfg.google_news_url, "https://news.google.com/rss/search");
    assert_eq!(cfg.upstream_timeout_secs, 10);
    assert_eq!(cfg.cache_ttl_secs, 3600);
    assert_eq!(cfg.cache_max_entries, 100);
    assert_eq!(cfg.cache_evict_count, 20);
    assert!(cfg.rules_path.is_none());
    assert_eq!(cfg.server_url, "http://127.0.0.1:3000");
}

#[test]
fn build_app_config_reads_api_key() {
    let mut map = HashMap::new();
    map.insert("NEWSAPI_API_KEY", "secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.newsapi_api_key.as_deref(), Some("secret-key"));
}

#[test]
fn blank_api_key_is_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("NEWSAPI_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.newsapi_api_key.is_none());
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("NEWSAPI_API_KEY", "secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("secret-key"), "key leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("GOODNEWS_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GOODNEWS_BIND_ADDR"
        ),
        "expected InvalidEnvVar(GOODNEWS_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn upstream_timeout_override() {
    let mut map = HashMap::new();
    map.insert("GOODNEWS_UPSTREAM_TIMEOUT_SECS", "4");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.upstream_timeout_secs, 4);
}

#[test]
fn upstream_timeout_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("GOODNEWS_UPSTREAM_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. })
                if var == "GOODNEWS_UPSTREAM_TIMEOUT_SECS"
        ),
        "expected InvalidEnvVar(GOODNEWS_UPSTREAM_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn cache_max_entries_invalid() {
    let mut map = HashMap::new();
    map.insert("GOODNEWS_CACHE_MAX_ENTRIES", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GOODNEWS_CACHE_MAX_ENTRIES"
        ),
        "expected InvalidEnvVar(GOODNEWS_CACHE_MAX_ENTRIES), got: {result:?}"
    );
}

#[test]
fn rules_path_is_optional() {
    let mut map = HashMap::new();
    map.insert("GOODNEWS_RULES_PATH", "./config/rules.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.rules_path.as_deref(),
        Some(std::path::Path::new("./config/rules.yaml"))
    );
}
