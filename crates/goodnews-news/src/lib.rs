//! Positive-news aggregation: source adapters, filtering, classification,
//! caching and the fallback state machine tying them together.

pub mod aggregator;
pub mod cache;
pub mod classifier;
pub mod client;
pub mod clock;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod sources;
pub mod store;

pub use aggregator::{Aggregator, Outcome, ResultPath};
pub use cache::{CacheEntry, CacheKey, CachePolicy, NewsCache};
pub use client::{RemoteNewsClient, RemoteOutcome, RemotePath};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AggregateError, NewsError};
pub use fallback::{is_placeholder, mock_articles};
pub use sources::{FetchOutcome, GoogleNewsClient, PrimarySource};
pub use store::{CacheStore, FileStore, MemoryStore};
