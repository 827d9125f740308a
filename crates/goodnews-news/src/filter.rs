//! Filter pipeline turning raw primary-source records into the published
//! article list.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use goodnews_core::{Article, ArticleSource, DisambiguationRule, Language};
use goodnews_newsapi::NewsApiArticle;

use crate::classifier::{categorize, has_negative, is_positive};

/// Maximum articles in any returned set.
pub const MAX_ARTICLES: usize = 8;

/// Trailing window, in days, an article must fall inside.
pub const RECENCY_WINDOW_DAYS: i64 = 7;

/// Below this many surviving candidates the positive-keyword requirement
/// is waived.
pub const LENIENCY_THRESHOLD: usize = 10;

const UNKNOWN_SOURCE: &str = "Unknown";

/// Publishers accepted for the restricted (French) language.
pub const FRENCH_DOMAINS: &[&str] = &[
    "lemonde.fr",
    "france24.com",
    "rfi.fr",
    "lefigaro.fr",
    "liberation.fr",
    "leparisien.fr",
    "lesechos.fr",
    "franceinfo.fr",
    "bfmtv.com",
    "lexpress.fr",
    "lepoint.fr",
    "marianne.net",
    "nouvelobs.com",
    "rtl.fr",
    "europe1.fr",
    "franceinter.fr",
    "radiofrance.fr",
    "tv5monde.org",
    "jeuneafrique.com",
    "hebdo.ch",
    "20minutes.fr",
    "lci.fr",
    "francebleu.fr",
];

fn domain_stem(domain: &str) -> &str {
    domain.rsplit_once('.').map_or(domain, |(stem, _)| stem)
}

/// `true` when a run of consecutive words in `name` spells `stem` once
/// joined, so "Le Monde" matches `lemonde` but "Courtland Times" does not
/// match `rtl`.
fn name_spells(words: &[String], stem: &str) -> bool {
    (0..words.len()).any(|start| {
        let mut joined = String::new();
        for word in &words[start..] {
            joined.push_str(word);
            if joined == stem {
                return true;
            }
            if joined.len() >= stem.len() {
                break;
            }
        }
        false
    })
}

/// `true` when the URL names an allow-listed domain, or whole words of the
/// source name spell a domain's stem.
#[must_use]
pub fn is_allow_listed(url: &str, source_name: Option<&str>) -> bool {
    let url = url.to_lowercase();
    if FRENCH_DOMAINS.iter().any(|d| url.contains(d)) {
        return true;
    }
    let words: Vec<String> = source_name
        .unwrap_or_default()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    !words.is_empty()
        && FRENCH_DOMAINS
            .iter()
            .any(|d| name_spells(&words, domain_stem(d)))
}

/// Sort newest first and keep at most [`MAX_ARTICLES`].
#[must_use]
pub fn sort_and_truncate(mut articles: Vec<Article>) -> Vec<Article> {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    articles.truncate(MAX_ARTICLES);
    articles
}

/// Inputs that shape one filter run.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub language: Language,
    pub rule: Option<&'a DisambiguationRule>,
    pub now: DateTime<Utc>,
}

struct Candidate {
    title: String,
    description: String,
    url: String,
    image_url: Option<String>,
    published_at: DateTime<Utc>,
    source_name: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Run the full pipeline over raw primary records.
#[must_use]
pub fn filter_primary(records: Vec<NewsApiArticle>, ctx: &FilterContext<'_>) -> Vec<Article> {
    let cutoff = ctx.now - Duration::days(RECENCY_WINDOW_DAYS);
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for record in records {
        if let Some(url) = record.url.as_deref() {
            if !seen.insert(url.to_string()) {
                tracing::debug!(url, "dropped duplicate record");
                continue;
            }
        }

        let source_name = non_empty(record.source_name().map(str::to_string));
        let (Some(title), Some(description), Some(url)) = (
            non_empty(record.title),
            non_empty(record.description),
            non_empty(record.url),
        ) else {
            tracing::debug!("dropped record missing title, description or url");
            continue;
        };

        let published_at = match record
            .published_at
            .as_deref()
            .map(DateTime::parse_from_rfc3339)
        {
            Some(Ok(ts)) => ts.with_timezone(&Utc),
            _ => {
                tracing::debug!(%url, "dropped record with unparsable publish time");
                continue;
            }
        };
        if published_at < cutoff || published_at > ctx.now {
            tracing::debug!(%url, %published_at, "dropped record outside the recency window");
            continue;
        }

        if let Some(rule) = ctx.rule {
            if rule.is_confused(&format!("{title} {description}")) {
                tracing::debug!(
                    %url,
                    country = %rule.country,
                    "dropped record about a confusable entity"
                );
                continue;
            }
        }

        if ctx.language.is_restricted() && !is_allow_listed(&url, source_name.as_deref()) {
            tracing::debug!(
                %url,
                source = ?source_name,
                "dropped record outside the publisher allow-list"
            );
            continue;
        }

        if has_negative(&title, &description) {
            tracing::debug!(%url, "dropped negative record");
            continue;
        }

        candidates.push(Candidate {
            title,
            description,
            url,
            image_url: non_empty(record.url_to_image),
            published_at,
            source_name,
        });
    }

    if candidates.len() >= LENIENCY_THRESHOLD {
        candidates.retain(|c| is_positive(&c.title, &c.description));
    } else {
        tracing::debug!(
            count = candidates.len(),
            "few candidates; positive keyword not required"
        );
    }

    let articles = candidates
        .into_iter()
        .map(|c| {
            let category = categorize(&c.title, &c.description, ctx.language);
            Article {
                title: c.title,
                description: c.description,
                url: c.url,
                image_url: c.image_url,
                published_at: c.published_at,
                source: ArticleSource::new(
                    c.source_name.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
                ),
                category,
            }
        })
        .collect();

    sort_and_truncate(articles)
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
