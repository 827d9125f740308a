//! NewsAPI request and response types.
//!
//! Every response is wrapped in a `{"status": "ok" | "error", ...}` envelope;
//! [`Envelope`] captures both shapes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Parameters for one `everything` search.
#[derive(Debug, Clone)]
pub struct EverythingQuery {
    /// Full-text query (supports `AND` / `OR` / quoted phrases).
    pub q: String,
    /// Two-letter language code.
    pub language: String,
    /// Comma-joined into the `domains` parameter when non-empty.
    pub domains: Vec<String>,
    /// Oldest publish time to return.
    pub from: DateTime<Utc>,
    /// Capped at 100 by the upstream.
    pub page_size: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub articles: Vec<NewsApiArticle>,
}

/// One raw record as returned by the upstream. Every field is optional
/// because the upstream routinely omits or nulls them.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiArticle {
    #[serde(default)]
    pub source: Option<NewsApiSource>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    /// Kept as a string; recency filtering decides what unparsable means.
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NewsApiSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl NewsApiArticle {
    /// Source display name, if the upstream supplied one.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.name.as_deref())
    }
}
