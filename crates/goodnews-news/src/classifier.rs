//! Keyword heuristics for positivity and topical category.
//!
//! Matching is case-insensitive and unanchored: a keyword embedded in a
//! longer word still counts. Every adapter uses these lists; there is no
//! second copy anywhere else in the workspace.

use goodnews_core::{Category, Language};

pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "crisis",
    "war",
    "attack",
    "death",
    "killed",
    "violence",
    "conflict",
    "disaster",
    "accident",
    "scandal",
    "corruption",
    "protest",
    "strike",
    "unrest",
    "dies",
    "murder",
    "bomb",
    "terror",
];

pub const POSITIVE_KEYWORDS: &[&str] = &[
    "achievement",
    "success",
    "innovation",
    "breakthrough",
    "progress",
    "development",
    "growth",
    "improvement",
    "discovery",
    "celebration",
    "milestone",
    "advancement",
    "partnership",
    "collaboration",
    "award",
    "recognition",
    "launch",
    "unveil",
    "announce",
    "initiative",
    "opens",
    "inaugurates",
    "celebrates",
    "wins",
    "achieves",
];

/// Checked before any other category, for every language.
const IT_DOMAIN_KEYWORDS: &[&str] = &[
    "mulesoft",
    "sap commerce cloud",
    "life in france",
    "french tech",
    "digital transformation",
    "software",
    "technology",
];

/// Per-language keyword sets in priority order.
struct CategoryKeywords {
    politics: &'static [&'static str],
    technology: &'static [&'static str],
    environment: &'static [&'static str],
    culture: &'static [&'static str],
    history: &'static [&'static str],
}

const ENGLISH: CategoryKeywords = CategoryKeywords {
    politics: &[
        "politic",
        "government",
        "minister",
        "president",
        "parliament",
        "election",
        "monarchy",
    ],
    technology: &[
        "tech",
        "digital",
        "software",
        "ai",
        "innovation",
        "startup",
        "computer",
        "internet",
    ],
    environment: &[
        "environment",
        "climate",
        "green",
        "renewable",
        "sustainability",
        "solar",
        "wind energy",
    ],
    culture: &[
        "culture",
        "art",
        "music",
        "festival",
        "heritage",
        "museum",
        "exhibition",
        "cinema",
        "theater",
        "literature",
        "football",
        "sport",
    ],
    history: &[
        "history",
        "archaeology",
        "discovery",
        "ancient",
        "historical",
        "archaeological",
    ],
};

const FRENCH: CategoryKeywords = CategoryKeywords {
    politics: &[
        "politique",
        "gouvernement",
        "ministre",
        "président",
        "parlement",
        "élection",
        "parti",
        "roi",
        "monarchie",
    ],
    technology: &[
        "technologie",
        "techno",
        "digital",
        "numérique",
        "informatique",
        "innovation",
        "startup",
        "ia",
        "intelligence artificielle",
    ],
    environment: &[
        "environnement",
        "climat",
        "écologie",
        "vert",
        "renouvelable",
        "durable",
        "solaire",
        "éolien",
    ],
    culture: &[
        "culture",
        "art",
        "musique",
        "festival",
        "patrimoine",
        "cinéma",
        "théâtre",
        "littérature",
        "football",
        "sport",
        "championnat",
    ],
    history: &[
        "histoire",
        "archéologie",
        "découverte",
        "ancien",
        "historique",
        "archéologique",
    ],
};

fn combined(title: &str, description: &str) -> String {
    format!("{title} {description}").to_lowercase()
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// `true` when the text contains any negative keyword.
#[must_use]
pub fn has_negative(title: &str, description: &str) -> bool {
    contains_any(&combined(title, description), NEGATIVE_KEYWORDS)
}

/// Negative keywords veto; otherwise at least one positive keyword is needed.
#[must_use]
pub fn is_positive(title: &str, description: &str) -> bool {
    let text = combined(title, description);
    if contains_any(&text, NEGATIVE_KEYWORDS) {
        return false;
    }
    contains_any(&text, POSITIVE_KEYWORDS)
}

/// First matching category in fixed priority order; `General` otherwise.
#[must_use]
pub fn categorize(title: &str, description: &str, language: Language) -> Category {
    let text = combined(title, description);

    if contains_any(&text, IT_DOMAIN_KEYWORDS) {
        return Category::ItDomain;
    }

    let keywords = match language {
        Language::En => &ENGLISH,
        Language::Fr => &FRENCH,
    };

    let ordered = [
        (keywords.politics, Category::Politics),
        (keywords.technology, Category::Technology),
        (keywords.environment, Category::Environment),
        (keywords.culture, Category::Culture),
        (keywords.history, Category::HistoryArchaeology),
    ];

    ordered
        .iter()
        .find(|(set, _)| contains_any(&text, set))
        .map_or(Category::General, |(_, category)| *category)
}
