//! Upstream source adapters.

mod attribution;
mod google_news;
mod newsapi;
pub(crate) mod rss_helpers;

pub use google_news::GoogleNewsClient;
pub use newsapi::{build_primary_query, PrimarySource};
pub use rss_helpers::RssItem;

/// What a source adapter produced for one request.
///
/// `Unavailable` means the source failed outright (transport, parse, or
/// not configured). An empty `Fetched` means it answered with nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    Fetched(Vec<T>),
    Unavailable,
}

impl<T> FetchOutcome<T> {
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FetchOutcome::Unavailable)
    }

    /// Records, treating an unavailable source as empty.
    #[must_use]
    pub fn into_records(self) -> Vec<T> {
        match self {
            FetchOutcome::Fetched(records) => records,
            FetchOutcome::Unavailable => Vec::new(),
        }
    }
}
