//! RSS item extraction and HTML stripping.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::NewsError;

/// Raw fields of one feed `<item>`. Markup inside `description` and
/// `content:encoded` is kept as-is; callers strip it when they need text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RssItem {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub description: String,
    pub content: String,
    /// Text of the aggregator's `<source>` element, when present.
    pub source_name: String,
    /// `url` attribute of the `<source>` element.
    pub source_url: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    PubDate,
    Description,
    Content,
    Source,
    Other,
}

fn field_for(name: &[u8]) -> Field {
    match name {
        b"title" => Field::Title,
        b"link" => Field::Link,
        b"pubDate" => Field::PubDate,
        b"description" => Field::Description,
        b"content:encoded" => Field::Content,
        b"source" => Field::Source,
        _ => Field::Other,
    }
}

fn source_url_attr(e: &BytesStart<'_>) -> String {
    e.try_get_attribute("url")
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok().map(std::borrow::Cow::into_owned))
        .unwrap_or_default()
}

impl RssItem {
    fn push(&mut self, field: Field, text: &str) {
        let target = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::PubDate => &mut self.pub_date,
            Field::Description => &mut self.description,
            Field::Content => &mut self.content,
            Field::Source => &mut self.source_name,
            Field::Other => return,
        };
        target.push_str(text);
    }

    fn trimmed(mut self) -> Self {
        for s in [
            &mut self.title,
            &mut self.link,
            &mut self.pub_date,
            &mut self.source_name,
        ] {
            *s = s.trim().to_string();
        }
        self
    }
}

/// Parse up to `max_items` `<item>` elements from an RSS document.
///
/// # Errors
///
/// Returns [`NewsError::Xml`] if the document is malformed before the
/// item limit is reached.
pub(crate) fn parse_rss_items(xml: &str, max_items: usize) -> Result<Vec<RssItem>, NewsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<RssItem> = None;
    let mut field = Field::Other;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                if name.as_ref() == b"item" {
                    current = Some(RssItem::default());
                    field = Field::Other;
                } else if let Some(item) = current.as_mut() {
                    field = field_for(name.as_ref());
                    if field == Field::Source {
                        item.source_url = source_url_attr(&e);
                    }
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item" {
                    if let Some(item) = current.take() {
                        items.push(item.trimmed());
                        if items.len() >= max_items {
                            break;
                        }
                    }
                }
                field = Field::Other;
            }
            Ok(Event::Text(e)) => {
                if let Some(item) = current.as_mut() {
                    let text = e.unescape().unwrap_or_default();
                    item.push(field, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(item) = current.as_mut() {
                    let text = String::from_utf8_lossy(e.as_ref());
                    item.push(field, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(NewsError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}

/// Strip HTML tags from a string and normalize whitespace.
pub(crate) fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters of `text`.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
