//! In-memory feed for pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use shindo_core::IndexEntry;

use crate::source::{FeedError, FeedSource};

pub(crate) const NO_TSUNAMI: &str = "この地震による津波の心配はありません。";

#[derive(Default)]
pub(crate) struct FakeFeed {
    index: Option<Vec<IndexEntry>>,
    details: HashMap<String, Value>,
    detail_delay: Duration,
    pub(crate) index_calls: AtomicUsize,
    pub(crate) fetched: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeFeed {
    /// A feed whose index cannot be retrieved.
    pub(crate) fn unavailable() -> Self {
        Self::default()
    }

    pub(crate) fn with_index(ids: &[String]) -> Self {
        Self {
            index: Some(
                ids.iter()
                    .map(|id| IndexEntry {
                        json: id.clone(),
                        int: None,
                        maxi: None,
                    })
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub(crate) fn detail(mut self, id: &str, doc: Value) -> Self {
        self.details.insert(id.to_string(), doc);
        self
    }

    /// Make every detail fetch take `delay` before answering.
    pub(crate) fn detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = delay;
        self
    }

    /// Most detail fetches observed running at the same time.
    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn index_calls(&self) -> usize {
        self.index_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for FakeFeed {
    async fn fetch_index(&self) -> Result<Vec<IndexEntry>, FeedError> {
        self.index_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.index.clone().ok_or_else(|| FeedError::Server {
            status: 503,
            url: "fake://list.json".into(),
        })
    }

    async fn fetch_detail(&self, entry: &IndexEntry) -> Result<Value, FeedError> {
        self.fetched.lock().unwrap().push(entry.json.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if self.detail_delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.detail_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.details
            .get(&entry.json)
            .cloned()
            .ok_or_else(|| FeedError::Server {
                status: 404,
                url: format!("fake://{}", entry.json),
            })
    }
}

fn earthquake(code: &str) -> Value {
    json!({
        "OriginTime": "2024-01-01T16:10:00+09:00",
        "Magnitude": "5.2",
        "Hypocenter": {"Area": {"Code": code, "Coordinate": "+37.5+137.2-10000/"}}
    })
}

pub(crate) fn detailed_doc(code: &str, prefs: &[&str]) -> Value {
    let pref: Vec<Value> = prefs
        .iter()
        .map(|p| {
            json!({"Code": p, "Area": [{"Code": code, "City": [{"Code": format!("{p}20400"), "MaxInt": "4"}]}]})
        })
        .collect();
    json!({
        "Body": {
            "Earthquake": earthquake(code),
            "Intensity": {"Observation": {"MaxInt": "4", "Pref": pref}},
            "Comments": {"ForecastComment": {"Text": NO_TSUNAMI}}
        }
    })
}

pub(crate) fn basic_doc(code: &str, comment: &str) -> Value {
    json!({
        "Body": {
            "Earthquake": earthquake(code),
            "Comments": {"ForecastComment": {"Text": comment}}
        }
    })
}
