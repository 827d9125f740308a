//! Publisher name and image inference for feed items that carry neither
//! as structured data.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

pub(crate) const DEFAULT_SOURCE_NAME: &str = "Google News";

const FRENCH_OUTLETS: &[&str] = &[
    "Le Monde",
    "Le Figaro",
    "Libération",
    "Le Parisien",
    "France 24",
    "RFI",
    "BFMTV",
    "L'Express",
    "Le Point",
    "Marianne",
    "L'Obs",
    "RTL",
    "Europe 1",
    "France Inter",
    "Boursorama",
    "Les Échos",
    "Le Temps",
    "La Tribune",
    "Challenges",
    "Capital",
    "Le Journal du Dimanche",
];

const INTERNATIONAL_OUTLETS: &[&str] = &[
    "Reuters",
    "BBC",
    "CNN",
    "The New York Times",
    "The Guardian",
    "Associated Press",
    "AP",
    "Al Jazeera",
    "Deutsche Welle",
    "Der Spiegel",
    "El País",
    "ANSA",
    "Corriere della Sera",
    "The Washington Post",
    "Bloomberg",
    "Financial Times",
    "Wall Street Journal",
    "WSJ",
];

const DOMAIN_NAMES: &[(&str, &str)] = &[
    ("lemonde.fr", "Le Monde"),
    ("lefigaro.fr", "Le Figaro"),
    ("liberation.fr", "Libération"),
    ("leparisien.fr", "Le Parisien"),
    ("france24.com", "France 24"),
    ("rfi.fr", "RFI"),
    ("bfmtv.com", "BFMTV"),
    ("lexpress.fr", "L'Express"),
    ("lepoint.fr", "Le Point"),
    ("marianne.net", "Marianne"),
    ("nouvelobs.com", "L'Obs"),
    ("rtl.fr", "RTL"),
    ("europe1.fr", "Europe 1"),
    ("franceinter.fr", "France Inter"),
    ("boursorama.com", "Boursorama"),
    ("lesechos.fr", "Les Échos"),
    ("reuters.com", "Reuters"),
    ("reuters.co.uk", "Reuters"),
    ("bbc.com", "BBC"),
    ("bbc.co.uk", "BBC"),
    ("cnn.com", "CNN"),
    ("nytimes.com", "The New York Times"),
    ("theguardian.com", "The Guardian"),
    ("ap.org", "Associated Press"),
    ("apnews.com", "Associated Press"),
    ("aljazeera.com", "Al Jazeera"),
    ("dw.com", "Deutsche Welle"),
    ("spiegel.de", "Der Spiegel"),
    ("elpais.com", "El País"),
    ("ansa.it", "ANSA"),
    ("corriere.it", "Corriere della Sera"),
];

/// Hosts that only redirect to the real publisher.
const AGGREGATOR_HOSTS: &[&str] = &["news.google.com"];

fn byline_regex(outlets: &[&str]) -> Regex {
    let alternation = outlets
        .iter()
        .map(|name| regex::escape(name).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)(?:^|\s)({alternation})(?:\.fr|\.com|\.net)?\b"))
        .expect("valid byline regex")
}

static FRENCH_BYLINE_RE: LazyLock<Regex> = LazyLock::new(|| byline_regex(FRENCH_OUTLETS));
static INTERNATIONAL_BYLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| byline_regex(INTERNATIONAL_OUTLETS));
static IMG_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]+src="([^"]+)""#).expect("valid img regex"));

fn normalize_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Known outlet named in free text, returned with its canonical spelling.
fn outlet_from_text(text: &str) -> Option<String> {
    [
        (&*FRENCH_BYLINE_RE, FRENCH_OUTLETS),
        (&*INTERNATIONAL_BYLINE_RE, INTERNATIONAL_OUTLETS),
    ]
    .into_iter()
    .find_map(|(re, outlets)| {
        let found = normalize_spaces(re.captures(text)?.get(1)?.as_str());
        let canonical = outlets
            .iter()
            .find(|o| o.to_lowercase() == found.to_lowercase())
            .map_or(found, |o| (*o).to_string());
        Some(canonical)
    })
}

fn host_of(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let host = url.host_str()?.to_lowercase();
    Some(host.strip_prefix("www.").map_or(host.clone(), str::to_string))
}

fn title_case_label(host: &str) -> Option<String> {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return None;
    }
    let label = labels[labels.len() - 2];
    let words: Vec<String> = label
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars
                .next()
                .map(|c| c.to_uppercase().chain(chars).collect())
                .unwrap_or_default()
        })
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

/// Display name for a host: the fixed table, else its title-cased
/// second-level label.
pub(crate) fn name_for_host(host: &str) -> Option<String> {
    DOMAIN_NAMES
        .iter()
        .find(|(domain, _)| *domain == host)
        .map(|(_, name)| (*name).to_string())
        .or_else(|| title_case_label(host))
}

/// Infer the publisher of a feed item.
///
/// Tries, in order: a known outlet named in the item text, the
/// aggregator-supplied source name, the publisher host (preferring the
/// `<source url>` host over redirect links), then the default label.
pub(crate) fn infer_source_name(
    text: &str,
    feed_source_name: &str,
    feed_source_url: &str,
    link: &str,
) -> String {
    if let Some(name) = outlet_from_text(text) {
        return name;
    }
    if !feed_source_name.trim().is_empty() {
        return feed_source_name.trim().to_string();
    }

    let host = host_of(feed_source_url).or_else(|| {
        host_of(link).filter(|h| !AGGREGATOR_HOSTS.contains(&h.as_str()))
    });

    host.as_deref()
        .and_then(name_for_host)
        .unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_string())
}

/// First `<img src="...">` in a block of markup.
pub(crate) fn extract_image(markup: &str) -> Option<String> {
    IMG_SRC_RE
        .captures(markup)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byline_in_title_wins() {
        assert_eq!(
            infer_source_name("Un parc solaire ouvre - Le  Monde", "", "", "https://x.test/a"),
            "Le Monde"
        );
        assert_eq!(
            infer_source_name("Harbour reopens, says reuters", "", "", ""),
            "Reuters"
        );
    }

    #[test]
    fn byline_requires_word_boundary() {
        // "ap" inside "apple" must not be read as Associated Press.
        assert_eq!(
            infer_source_name("Local apple harvest", "", "", "https://www.apnews.com/x"),
            "Associated Press"
        );
        assert_eq!(
            infer_source_name("Local apple harvest", "", "", "https://www.farm-news.org/x"),
            "Farm News"
        );
    }

    #[test]
    fn feed_source_element_is_used_before_hosts() {
        assert_eq!(
            infer_source_name("Festival", "Hespress", "https://www.hespress.com", ""),
            "Hespress"
        );
    }

    #[test]
    fn source_url_host_maps_through_table() {
        assert_eq!(
            infer_source_name(
                "Festival",
                "",
                "https://www.lefigaro.fr",
                "https://news.google.com/rss/articles/x"
            ),
            "Le Figaro"
        );
    }

    #[test]
    fn redirect_host_alone_falls_back_to_default() {
        assert_eq!(
            infer_source_name("Festival", "", "", "https://news.google.com/rss/articles/x"),
            DEFAULT_SOURCE_NAME
        );
        assert_eq!(infer_source_name("Festival", "", "", "not a url"), DEFAULT_SOURCE_NAME);
    }

    #[test]
    fn unmapped_host_is_title_cased() {
        assert_eq!(name_for_host("le_matin-maroc.ma").as_deref(), Some("Le Matin Maroc"));
        assert_eq!(name_for_host("bbc.co.uk").as_deref(), Some("BBC"));
        assert_eq!(name_for_host("localhost"), None);
    }

    #[test]
    fn image_is_first_img_src() {
        let markup = concat!(
            r#"<p><img alt="x" src="https://img.test/1.jpg">"#,
            r#"<img src="https://img.test/2.jpg"></p>"#,
        );
        assert_eq!(extract_image(markup).as_deref(), Some("https://img.test/1.jpg"));
        assert_eq!(extract_image("<p>no image</p>"), None);
    }
}
