//! Feed layer: upstream JMA client, bulletin ingestion, snapshot refresh.

mod coalesce;
pub mod ingest;
pub mod refresh;
pub mod source;

#[cfg(feature = "http")]
pub mod http;

#[cfg(test)]
mod fake;

pub use ingest::{INDEX_WINDOW, ingest};
pub use refresh::{RefreshError, Refresher, spawn_schedule};
pub use source::{FeedError, FeedSource};

#[cfg(feature = "http")]
pub use http::JmaClient;
