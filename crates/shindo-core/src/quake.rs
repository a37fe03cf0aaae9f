//! Canonical earthquake records shared between ingestion, the snapshot cache,
//! and the translator.
//!
//! These are the shapes stored under `earthquakes:latest`. Upstream field
//! names (`OriginTime`, `Hypocenter`, ...) never leak past [`crate::normalize`].

use serde::{Deserialize, Serialize};

/// Epicenter identifier and its `lat+long-depth` coordinate string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub code: String,
    pub coordinate: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comments {
    pub has_tsunami_warning: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub city_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub area_code: String,
    pub cities: Vec<City>,
}

/// One prefecture with intensity observations, in upstream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub pref_code: String,
    pub areas: Vec<Area>,
}

/// A bulletin with a prefecture ⊃ area ⊃ city intensity breakdown.
///
/// `regions` is never empty: a bulletin without prefecture observations is
/// dropped during normalisation instead of being stored with no regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedEarthquake {
    /// Origin time as published upstream (ISO 8601 with offset).
    pub time: String,
    /// Kept as a string: upstream publishes placeholders such as `"Ｍ不明"`.
    pub magnitude: String,
    pub max_intensity: String,
    pub location: Location,
    pub regions: Vec<Region>,
    pub comments: Comments,
}

/// A bulletin carrying only epicenter-level information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicEarthquake {
    pub time: String,
    pub magnitude: String,
    pub location: Location,
    pub comments: Comments,
}

/// The cached unit: every currently-valid normalised bulletin.
///
/// A snapshot is written whole and replaced whole; there is no merge with a
/// previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub detailed: Vec<DetailedEarthquake>,
    pub basic: Vec<BasicEarthquake>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.detailed.len() + self.basic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detailed.is_empty() && self.basic.is_empty()
    }
}
