//! Shopping-site item search used as raw product material.
//!
//! Each source looks up a single item by JAN code and reduces it to a
//! [`Product`]. Sources are queried independently; one failing never
//! affects another.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::AiError;
use crate::product::{JanCode, Product};

pub const RAKUTEN_BASE_URL: &str =
    "https://app.rakuten.co.jp/services/api/IchibaItem/Search/20220601";
pub const YAHOO_BASE_URL: &str = "https://shopping.yahooapis.jp/ShoppingWebService/V3/itemSearch";

#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn fetch(&self, jan: &JanCode) -> Result<Product, AiError>;
}

async fn get_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, AiError> {
    let resp = request.send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(AiError::Server {
            status: status.as_u16(),
            body: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp.json().await?)
}

fn join_description(first: &str, second: &str) -> String {
    format!("{first} {second}").trim().to_string()
}

// -- Rakuten Ichiba --

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RakutenResponse {
    #[serde(default)]
    items: Vec<RakutenEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RakutenEntry {
    item: RakutenItem,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RakutenItem {
    item_name: String,
    #[serde(default)]
    catchcopy: String,
    item_caption: String,
}

impl RakutenResponse {
    fn into_product(self) -> Result<Product, AiError> {
        let item = self.items.into_iter().next().ok_or(AiError::NotFound)?.item;
        Ok(Product {
            name: item.item_name,
            description: join_description(&item.catchcopy, &item.item_caption),
        })
    }
}

pub struct RakutenClient {
    client: reqwest::Client,
    base_url: String,
    app_id: String,
}

impl RakutenClient {
    pub fn new(app_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: RAKUTEN_BASE_URL.to_string(),
            app_id,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl ProductSource for RakutenClient {
    fn name(&self) -> &'static str {
        "rakuten"
    }

    async fn fetch(&self, jan: &JanCode) -> Result<Product, AiError> {
        debug!(jan = %jan, "rakuten item search");
        let request = self.client.get(&self.base_url).query(&[
            ("format", "json"),
            ("keyword", jan.as_str()),
            ("applicationId", self.app_id.as_str()),
            ("hits", "1"),
        ]);
        get_json::<RakutenResponse>(request).await?.into_product()
    }
}

// -- Yahoo! Shopping --

#[derive(Deserialize)]
struct YahooResponse {
    #[serde(default)]
    hits: Vec<YahooHit>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooHit {
    name: String,
    description: String,
    #[serde(default)]
    head_line: String,
}

impl YahooResponse {
    fn into_product(self) -> Result<Product, AiError> {
        let hit = self.hits.into_iter().next().ok_or(AiError::NotFound)?;
        Ok(Product {
            name: hit.name,
            description: join_description(&hit.description, &hit.head_line),
        })
    }
}

pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
    app_id: String,
}

impl YahooClient {
    pub fn new(app_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: YAHOO_BASE_URL.to_string(),
            app_id,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl ProductSource for YahooClient {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch(&self, jan: &JanCode) -> Result<Product, AiError> {
        debug!(jan = %jan, "yahoo item search");
        let request = self.client.get(&self.base_url).query(&[
            ("appid", self.app_id.as_str()),
            ("jan_code", jan.as_str()),
            ("results", "1"),
        ]);
        get_json::<YahooResponse>(request).await?.into_product()
    }
}
