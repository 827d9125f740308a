use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub newsapi_api_key: Option<String>,
    pub newsapi_base_url: String,
    pub google_news_url: String,
    pub upstream_timeout_secs: u64,
    pub user_agent: String,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: usize,
    pub cache_evict_count: usize,
    pub rules_path: Option<PathBuf>,
    pub client_cache_path: PathBuf,
    pub server_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "newsapi_api_key",
                &self.newsapi_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("newsapi_base_url", &self.newsapi_base_url)
            .field("google_news_url", &self.google_news_url)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_max_entries", &self.cache_max_entries)
            .field("cache_evict_count", &self.cache_evict_count)
            .field("rules_path", &self.rules_path)
            .field("client_cache_path", &self.client_cache_path)
            .field("server_url", &self.server_url)
            .finish()
    }
}
