//! HTTP client for the JMA bosai quake feed.

use async_trait::async_trait;
use serde_json::Value;
use shindo_core::IndexEntry;
use tracing::{debug, info};

use crate::source::{FeedError, FeedSource};

pub const DEFAULT_BASE_URL: &str = "https://www.jma.go.jp/bosai/quake/data";

/// Client for `list.json` and the per-bulletin detail documents next to it.
///
/// No request timeout is configured; a hung upstream stalls the refresh until
/// the transport gives up.
pub struct JmaClient {
    client: reqwest::Client,
    base_url: String,
}

impl JmaClient {
    /// Create a client for the given feed base URL.
    ///
    /// `base_url` should be like `https://www.jma.go.jp/bosai/quake/data`
    /// (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn index_url(&self) -> String {
        format!("{}/list.json", self.base_url)
    }

    pub fn detail_url(&self, entry: &IndexEntry) -> String {
        format!("{}/{}", self.base_url, entry.document_id())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FeedError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Server {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl Default for JmaClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL.to_string())
    }
}

#[async_trait]
impl FeedSource for JmaClient {
    async fn fetch_index(&self) -> Result<Vec<IndexEntry>, FeedError> {
        let url = self.index_url();
        info!(url = %url, "fetching bulletin index");
        let entries: Vec<IndexEntry> = self.get_json(&url).await?;
        info!(count = entries.len(), "fetched bulletin index");
        Ok(entries)
    }

    async fn fetch_detail(&self, entry: &IndexEntry) -> Result<Value, FeedError> {
        let url = self.detail_url(entry);
        debug!(url = %url, "fetching bulletin detail");
        self.get_json(&url).await
    }
}
