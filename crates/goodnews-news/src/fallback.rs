//! Synthetic result set used when no real source answered.

use chrono::{DateTime, Duration, Utc};
use goodnews_core::{country_name, Article, ArticleSource, Category};
use reqwest::Url;

/// Every synthetic article lives on this host; any cached entry that links
/// here is a placeholder, not real news.
pub const PLACEHOLDER_DOMAIN: &str = "example.com";

struct Template {
    slug: &'static str,
    title: fn(&str) -> String,
    description: &'static str,
    image: &'static str,
    source: &'static str,
    category: Category,
    age_hours: i64,
}

fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const TEMPLATES: &[Template] = &[
    Template {
        slug: "renewable-energy",
        title: |n| format!("{} announces major renewable energy initiative", capitalized(n)),
        description: "A groundbreaking renewable energy project has been launched, marking a \
            significant step towards sustainability and environmental protection.",
        image: "https://images.unsplash.com/photo-1466611653911-95081537e5b7?w=800",
        source: "Tech News",
        category: Category::Environment,
        age_hours: 0,
    },
    Template {
        slug: "tech-breakthrough",
        title: |n| format!("New technology breakthrough in {n}"),
        description: "Scientists and engineers have achieved a major technological advancement \
            that promises to revolutionize the industry.",
        image: "https://images.unsplash.com/photo-1518770660439-4636190af475?w=800",
        source: "Science Daily",
        category: Category::Technology,
        age_hours: 24,
    },
    Template {
        slug: "culture-festival",
        title: |n| format!("Cultural festival celebrates {n}'s rich heritage"),
        description: "A vibrant cultural festival showcasing traditional arts, music, and \
            cuisine has brought communities together in celebration.",
        image: "https://images.unsplash.com/photo-1514525253161-7a46d19cd819?w=800",
        source: "Culture Today",
        category: Category::Culture,
        age_hours: 48,
    },
    Template {
        slug: "archaeology",
        title: |n| format!("Archaeological discovery reveals ancient history in {n}"),
        description: "A remarkable archaeological find has uncovered new insights into the \
            region's ancient past, exciting historians worldwide.",
        image: "https://images.unsplash.com/photo-1583454110551-21f2fa2afe61?w=800",
        source: "History Channel",
        category: Category::HistoryArchaeology,
        age_hours: 72,
    },
    Template {
        slug: "digital-transformation",
        title: |n| format!("Digital transformation initiative launched in {n}"),
        description: "A comprehensive digital transformation program aims to modernize public \
            services and improve citizen experience.",
        image: "https://images.unsplash.com/photo-1550751827-4bd374c3f58b?w=800",
        source: "Tech Weekly",
        category: Category::ItDomain,
        age_hours: 96,
    },
    Template {
        slug: "partnership",
        title: |n| format!("International partnership strengthens {n}'s economy"),
        description: "A new international collaboration agreement promises economic growth and \
            job creation opportunities.",
        image: "https://images.unsplash.com/photo-1556761175-5973dc0f32e7?w=800",
        source: "Business News",
        category: Category::Politics,
        age_hours: 120,
    },
    Template {
        slug: "innovation-hub",
        title: |n| format!("Innovation hub opens in {n}"),
        description: "A state-of-the-art innovation center has opened its doors, providing \
            space for startups and tech companies to thrive.",
        image: "https://images.unsplash.com/photo-1522071820081-009f0129c71c?w=800",
        source: "Innovation Today",
        category: Category::Technology,
        age_hours: 144,
    },
    // Six and a half days so the oldest item stays inside the 7-day window.
    Template {
        slug: "sustainable-agriculture",
        title: |n| format!("Sustainable agriculture program benefits {n}"),
        description: "An innovative sustainable agriculture initiative is helping farmers \
            increase yields while protecting the environment.",
        image: "https://images.unsplash.com/photo-1625246333195-78d9c38ad449?w=800",
        source: "Green News",
        category: Category::Environment,
        age_hours: 156,
    },
];

/// Build the eight synthetic articles for `country_code`, newest first.
#[must_use]
pub fn mock_articles(country_code: &str, now: DateTime<Utc>) -> Vec<Article> {
    let code = country_code.trim().to_lowercase();
    let name = country_name(&code);
    TEMPLATES
        .iter()
        .map(|t| Article {
            title: (t.title)(&name),
            description: t.description.to_string(),
            url: format!("https://{PLACEHOLDER_DOMAIN}/news/{code}-{}", t.slug),
            image_url: Some(t.image.to_string()),
            published_at: now - Duration::hours(t.age_hours),
            source: ArticleSource::new(t.source),
            category: t.category,
        })
        .collect()
}

/// `true` when any article links to the placeholder host.
#[must_use]
pub fn is_placeholder(articles: &[Article]) -> bool {
    articles.iter().any(|a| {
        Url::parse(&a.url).is_ok_and(|url| {
            url.host_str().is_some_and(|host| {
                host == PLACEHOLDER_DOMAIN || host.ends_with(&format!(".{PLACEHOLDER_DOMAIN}"))
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 8, 12, 0, 0).unwrap()
    }

    #[test]
    fn builds_eight_articles_named_after_the_country() {
        let articles = mock_articles("MA", now());
        assert_eq!(articles.len(), 8);
        assert_eq!(
            articles[0].title,
            "Morocco announces major renewable energy initiative"
        );
        assert_eq!(articles[1].title, "New technology breakthrough in morocco");
        assert_eq!(articles[0].url, "https://example.com/news/ma-renewable-energy");
    }

    #[test]
    fn articles_are_newest_first_within_seven_days() {
        let articles = mock_articles("FR", now());
        for pair in articles.windows(2) {
            assert!(pair[0].published_at > pair[1].published_at);
        }
        let cutoff = now() - Duration::days(7);
        assert!(articles.iter().all(|a| a.published_at >= cutoff));
    }

    #[test]
    fn urls_are_unique_and_images_present() {
        let articles = mock_articles("JP", now());
        let urls: HashSet<_> = articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls.len(), 8);
        assert!(articles.iter().all(|a| a.image_url.is_some()));
    }

    #[test]
    fn fixed_categories() {
        let categories: Vec<_> = mock_articles("DE", now())
            .into_iter()
            .map(|a| a.category)
            .collect();
        assert_eq!(
            categories,
            vec![
                Category::Environment,
                Category::Technology,
                Category::Culture,
                Category::HistoryArchaeology,
                Category::ItDomain,
                Category::Politics,
                Category::Technology,
                Category::Environment,
            ]
        );
    }

    #[test]
    fn placeholder_detection() {
        assert!(is_placeholder(&mock_articles("FR", now())));

        let mut real = mock_articles("FR", now());
        for a in &mut real {
            a.url = a.url.replace("example.com", "lemonde.fr");
        }
        assert!(!is_placeholder(&real));
        assert!(!is_placeholder(&[]));

        // Host match only, not a substring anywhere in the URL.
        real[0].url = "https://lemonde.fr/see-example.com".to_string();
        assert!(!is_placeholder(&real));
    }

    #[test]
    fn placeholder_detection_parses_hosts() {
        let mut articles = mock_articles("FR", now());
        articles.truncate(1);
        for (url, expected) in [
            ("https://www.example.com/x", true),
            ("https://example.com:8080/x", true),
            ("https://EXAMPLE.com/x", true),
            ("https://user@example.com/x", true),
            ("https://notexample.com/x", false),
            ("https://example.com.evil.test/x", false),
            ("not a url", false),
        ] {
            articles[0].url = url.to_string();
            assert_eq!(is_placeholder(&articles), expected, "{url}");
        }
    }
}
