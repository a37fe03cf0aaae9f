//! The upstream feed port.

use async_trait::async_trait;
use serde_json::Value;
use shindo_core::IndexEntry;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status} for {url}")]
    Server { status: u16, url: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where bulletins come from: the index of recent announcements and one
/// detail document per announcement.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the bulletin index, most recent first.
    async fn fetch_index(&self) -> Result<Vec<IndexEntry>, FeedError>;

    /// Fetch the raw detail document for one index entry.
    async fn fetch_detail(&self, entry: &IndexEntry) -> Result<Value, FeedError>;
}
