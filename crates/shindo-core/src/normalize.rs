//! Raw detail document → canonical record.
//!
//! Each document is normalised in isolation. A document that cannot be
//! represented is dropped with a [`RecordError`] and never aborts the batch.
//!
//! The two tsunami rules differ on purpose and mirror the upstream data:
//!
//! - detailed bulletins: warning unless the forecast comment is exactly
//!   [`NO_TSUNAMI_CONCERN`]
//! - basic bulletins: warning only when the forecast comment is exactly
//!   [`BASIC_TSUNAMI_FLAG`]
//!
//! Both are exact string comparisons and will misfire if JMA rewords the
//! comment text.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::jma::{AreaObservation, BasicDocument, CityObservation, DetailedDocument, PrefObservation};
use crate::quake::{Area, BasicEarthquake, City, Comments, DetailedEarthquake, Location, Region};

/// Forecast comment published when an earthquake poses no tsunami risk.
pub const NO_TSUNAMI_CONCERN: &str = "この地震による津波の心配はありません。";

/// Forecast comment value that flags a tsunami on basic bulletins.
pub const BASIC_TSUNAMI_FLAG: &str = "1";

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("document has no Body.Earthquake section")]
    MissingBody,
    #[error("document shape mismatch: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("bulletin has no prefecture intensity observations")]
    NoRegions,
}

/// Normalise a detailed bulletin, or explain why it was dropped.
pub fn try_normalize_detailed(raw: &Value) -> Result<DetailedEarthquake, RecordError> {
    require_earthquake_body(raw)?;
    let body = DetailedDocument::deserialize(raw)?.body;
    let observation = body.intensity.observation;
    if observation.pref.is_empty() {
        return Err(RecordError::NoRegions);
    }

    let quake = body.earthquake;
    Ok(DetailedEarthquake {
        time: quake.origin_time,
        magnitude: quake.magnitude,
        max_intensity: observation.max_int,
        location: Location {
            code: quake.hypocenter.area.code,
            coordinate: quake.hypocenter.area.coordinate,
        },
        regions: observation.pref.into_iter().map(Region::from).collect(),
        comments: Comments {
            has_tsunami_warning: detailed_tsunami_warning(&body.comments.forecast_comment.text),
        },
    })
}

/// Normalise a basic bulletin, or explain why it was dropped.
pub fn try_normalize_basic(raw: &Value) -> Result<BasicEarthquake, RecordError> {
    require_earthquake_body(raw)?;
    let body = BasicDocument::deserialize(raw)?.body;
    let quake = body.earthquake;
    Ok(BasicEarthquake {
        time: quake.origin_time,
        magnitude: quake.magnitude,
        location: Location {
            code: quake.hypocenter.area.code,
            coordinate: quake.hypocenter.area.coordinate,
        },
        comments: Comments {
            has_tsunami_warning: basic_tsunami_warning(&body.comments.forecast_comment.text),
        },
    })
}

/// Normalise a detailed bulletin; unusable documents are logged and yield `None`.
pub fn normalize_detailed(raw: &Value) -> Option<DetailedEarthquake> {
    try_normalize_detailed(raw)
        .inspect_err(|e| warn!(error = %e, "dropping detailed bulletin"))
        .ok()
}

/// Normalise a basic bulletin; unusable documents are logged and yield `None`.
pub fn normalize_basic(raw: &Value) -> Option<BasicEarthquake> {
    try_normalize_basic(raw)
        .inspect_err(|e| warn!(error = %e, "dropping basic bulletin"))
        .ok()
}

pub fn detailed_tsunami_warning(comment: &str) -> bool {
    comment != NO_TSUNAMI_CONCERN
}

pub fn basic_tsunami_warning(comment: &str) -> bool {
    comment == BASIC_TSUNAMI_FLAG
}

fn require_earthquake_body(raw: &Value) -> Result<(), RecordError> {
    match raw.pointer("/Body/Earthquake") {
        Some(Value::Object(_)) => Ok(()),
        _ => Err(RecordError::MissingBody),
    }
}

impl From<PrefObservation> for Region {
    fn from(pref: PrefObservation) -> Self {
        Self {
            pref_code: pref.code,
            areas: pref.area.into_iter().map(Area::from).collect(),
        }
    }
}

impl From<AreaObservation> for Area {
    fn from(area: AreaObservation) -> Self {
        Self {
            area_code: area.code,
            cities: area.city.into_iter().map(City::from).collect(),
        }
    }
}

impl From<CityObservation> for City {
    fn from(city: CityObservation) -> Self {
        Self {
            city_code: city.code,
        }
    }
}
