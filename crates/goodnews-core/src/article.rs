use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized news article as returned to callers and stored in caches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: String,
    /// Deduplication key within one result set.
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source: ArticleSource,
    pub category: Category,
}

/// Display attribution for an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub name: String,
}

impl ArticleSource {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Topical category assigned once per article by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Politics,
    Technology,
    Environment,
    Culture,
    #[serde(rename = "History & Archaeology")]
    HistoryArchaeology,
    #[serde(rename = "IT Domain")]
    ItDomain,
    General,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Politics => write!(f, "Politics"),
            Category::Technology => write!(f, "Technology"),
            Category::Environment => write!(f, "Environment"),
            Category::Culture => write!(f, "Culture"),
            Category::HistoryArchaeology => write!(f, "History & Archaeology"),
            Category::ItDomain => write!(f, "IT Domain"),
            Category::General => write!(f, "General"),
        }
    }
}

/// Language of the requested news feed.
///
/// French is the restricted language: results must come from the French
/// publisher allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    /// Parse a request parameter. `fr` selects French; anything else,
    /// including a missing value, selects English.
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("fr") => Language::Fr,
            _ => Language::En,
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    #[must_use]
    pub fn is_restricted(self) -> bool {
        matches!(self, Language::Fr)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn article_serializes_with_camel_case_fields() {
        let article = Article {
            title: "Solar farm opens".to_string(),
            description: "A new plant".to_string(),
            url: "https://lemonde.fr/a".to_string(),
            image_url: None,
            published_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            source: ArticleSource::new("Le Monde"),
            category: Category::Environment,
        };
        let json = serde_json::to_value(&article).expect("serialize");
        assert_eq!(json["imageUrl"], serde_json::Value::Null);
        assert_eq!(json["publishedAt"], "2025-03-01T12:00:00Z");
        assert_eq!(json["source"]["name"], "Le Monde");
        assert_eq!(json["category"], "Environment");
    }

    #[test]
    fn category_uses_display_names_on_the_wire() {
        let json = serde_json::to_string(&Category::HistoryArchaeology).expect("serialize");
        assert_eq!(json, "\"History & Archaeology\"");
        let back: Category = serde_json::from_str("\"IT Domain\"").expect("deserialize");
        assert_eq!(back, Category::ItDomain);
        assert_eq!(Category::ItDomain.to_string(), "IT Domain");
    }

    #[test]
    fn language_param_defaults_to_english() {
        assert_eq!(Language::from_param(None), Language::En);
        assert_eq!(Language::from_param(Some("de")), Language::En);
        assert_eq!(Language::from_param(Some("FR")), Language::Fr);
        assert_eq!(Language::from_param(Some(" fr ")), Language::Fr);
    }

    #[test]
    fn only_french_is_restricted() {
        assert!(Language::Fr.is_restricted());
        assert!(!Language::En.is_restricted());
    }
}
