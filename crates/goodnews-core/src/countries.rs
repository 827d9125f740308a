use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// ISO-3166-1 alpha-2 code to canonical lowercase English name.
///
/// `IL` is Israel. It must never be read as the Illinois postal abbreviation.
const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("AR", "argentina"),
    ("AT", "austria"),
    ("AU", "australia"),
    ("BE", "belgium"),
    ("BR", "brazil"),
    ("CA", "canada"),
    ("CH", "switzerland"),
    ("CN", "china"),
    ("DE", "germany"),
    ("EG", "egypt"),
    ("ES", "spain"),
    ("FR", "france"),
    ("GB", "united kingdom"),
    ("GE", "georgia"),
    ("IL", "israel"),
    ("IN", "india"),
    ("IT", "italy"),
    ("JP", "japan"),
    ("KE", "kenya"),
    ("MA", "morocco"),
    ("MX", "mexico"),
    ("NG", "nigeria"),
    ("NL", "netherlands"),
    ("PT", "portugal"),
    ("US", "united states"),
    ("ZA", "south africa"),
];

/// Resolve a country code to its display name.
///
/// Unknown codes fall back to the lowercased code itself so the upstream
/// query still has something to search for.
#[must_use]
pub fn country_name(code: &str) -> String {
    let code = code.trim();
    COUNTRY_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map_or_else(|| code.to_lowercase(), |(_, name)| (*name).to_string())
}

/// All `(code, name)` pairs in the resolution table, sorted by code.
#[must_use]
pub fn known_countries() -> &'static [(&'static str, &'static str)] {
    COUNTRY_NAMES
}

/// Per-country rule separating the intended country from a better-known
/// entity with the same name (e.g. Israel vs. Illinois).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisambiguationRule {
    /// ISO alpha-2 code the rule applies to.
    pub country: String,
    /// Replacement search query for the scraped feed, including its own
    /// exclusion operators.
    #[serde(default)]
    pub search_query: Option<String>,
    /// Terms naming the confusable entity.
    #[serde(default)]
    pub exclude_terms: Vec<String>,
    /// Terms that place the text in the intended country.
    pub require_terms: Vec<String>,
}

impl DisambiguationRule {
    fn mentions_any(text: &str, terms: &[String]) -> bool {
        let lower = text.to_lowercase();
        terms.iter().any(|t| lower.contains(&t.to_lowercase()))
    }

    /// `true` when the text talks about the confusable entity without a
    /// single term placing it in the intended country.
    #[must_use]
    pub fn is_confused(&self, text: &str) -> bool {
        Self::mentions_any(text, &self.exclude_terms)
            && !Self::mentions_any(text, &self.require_terms)
    }

    /// Strict form used on the scraped feed: the text must mention the
    /// intended country and none of the confusable terms.
    #[must_use]
    pub fn is_on_topic(&self, text: &str) -> bool {
        Self::mentions_any(text, &self.require_terms)
            && !Self::mentions_any(text, &self.exclude_terms)
    }
}

#[derive(Debug, Deserialize)]
pub struct RulesFile {
    pub rules: Vec<DisambiguationRule>,
}

/// Disambiguation rules keyed by uppercase country code.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: HashMap<String, DisambiguationRule>,
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

impl RuleSet {
    /// Rules shipped with the binary.
    #[must_use]
    pub fn builtin() -> Self {
        let mut set = Self::default();
        set.insert(DisambiguationRule {
            country: "IL".to_string(),
            search_query: Some(
                "\"Israel\" OR \"State of Israel\" -Illinois -\"state of Illinois\" -\"IL state\" -\"Illinois state\""
                    .to_string(),
            ),
            exclude_terms: terms(&[
                "illinois",
                "chicago",
                "springfield",
                "state of illinois",
                "il state",
            ]),
            require_terms: terms(&[
                "israel",
                "israeli",
                "jerusalem",
                "tel aviv",
                "gaza",
                "west bank",
                "palestine",
                "middle east",
            ]),
        });
        set.insert(DisambiguationRule {
            country: "GE".to_string(),
            search_query: Some(
                "\"Georgia\" (Tbilisi OR Georgian OR Caucasus) -Atlanta -\"Georgia state\""
                    .to_string(),
            ),
            exclude_terms: terms(&[
                "atlanta",
                "savannah",
                "augusta",
                "georgia state",
                "peach state",
            ]),
            require_terms: terms(&["tbilisi", "georgian", "caucasus", "batumi", "kutaisi"]),
        });
        set
    }

    /// Built-in rules with file rules layered on top; a file rule replaces
    /// the built-in rule for the same country.
    #[must_use]
    pub fn with_overrides(file: RulesFile) -> Self {
        let mut set = Self::builtin();
        for rule in file.rules {
            set.insert(rule);
        }
        set
    }

    pub fn insert(&mut self, mut rule: DisambiguationRule) {
        rule.country = rule.country.trim().to_uppercase();
        self.rules.insert(rule.country.clone(), rule);
    }

    #[must_use]
    pub fn get(&self, country_code: &str) -> Option<&DisambiguationRule> {
        self.rules.get(&country_code.trim().to_uppercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Load and validate extra disambiguation rules from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_rules(path: &Path) -> Result<RulesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let rules_file: RulesFile = serde_yaml::from_str(&content)?;
    validate_rules(&rules_file)?;

    Ok(rules_file)
}

fn validate_rules(rules_file: &RulesFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for rule in &rules_file.rules {
        let code = rule.country.trim().to_uppercase();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidRule(format!(
                "country '{}' is not an ISO alpha-2 code",
                rule.country
            )));
        }

        if rule.require_terms.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::InvalidRule(format!(
                "rule for '{code}' needs at least one require term"
            )));
        }

        if !seen.insert(code.clone()) {
            return Err(ConfigError::InvalidRule(format!(
                "duplicate rule for country '{code}'"
            )));
        }
    }

    Ok(())
}
