//! HTTP client for the NewsAPI `everything` endpoint.
//!
//! The client only knows the upstream wire contract: request parameters,
//! the `{status, articles | code, message}` envelope, and which failures are
//! quota signals. Filtering and fallback decisions live in `goodnews-news`.

mod client;
mod error;
mod types;

pub use client::NewsApiClient;
pub use error::NewsApiError;
pub use types::{EverythingQuery, NewsApiArticle, NewsApiSource};
