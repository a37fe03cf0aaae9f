//! Wire types for the JMA bosai quake feed.
//!
//! `list.json` is an array of [`IndexEntry`]; each entry's `json` field names
//! a detail document under the same base URL. Detail documents are large and
//! loosely versioned, so only the fields the normaliser reads are modelled.
//! Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// One bulletin announcement from `list.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Detail document file name, e.g. `20240101161500_20240101161010_VXSE53_1.json`.
    pub json: String,
    /// Per-prefecture intensity summary. Opaque to this pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int: Option<Vec<serde_json::Value>>,
    /// Maximum observed intensity, when the bulletin carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxi: Option<String>,
}

impl IndexEntry {
    pub fn document_id(&self) -> &str {
        &self.json
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetailedDocument {
    pub body: DetailedBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetailedBody {
    pub earthquake: EarthquakeBody,
    pub intensity: IntensityBody,
    pub comments: CommentsBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BasicDocument {
    pub body: BasicBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BasicBody {
    pub earthquake: EarthquakeBody,
    pub comments: CommentsBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EarthquakeBody {
    pub origin_time: String,
    pub magnitude: String,
    pub hypocenter: Hypocenter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Hypocenter {
    pub area: HypocenterArea,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HypocenterArea {
    pub code: String,
    pub coordinate: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IntensityBody {
    pub observation: Observation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Observation {
    pub max_int: String,
    pub pref: Vec<PrefObservation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrefObservation {
    pub code: String,
    pub area: Vec<AreaObservation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AreaObservation {
    pub code: String,
    pub city: Vec<CityObservation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CityObservation {
    pub code: String,
    pub max_int: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommentsBody {
    pub forecast_comment: ForecastComment,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForecastComment {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_entry_ignores_unknown_fields() {
        let json = r#"{
            "ctt": "20240101161500",
            "eid": "20240101161010",
            "ttl": "震源・震度情報",
            "json": "20240101161500_20240101161010_VXSE53_1.json",
            "maxi": "7",
            "int": [{"code": "17", "maxi": "7"}]
        }"#;
        let entry: IndexEntry = serde_json::from_str(json).unwrap();
        assert_eq!(
            entry.document_id(),
            "20240101161500_20240101161010_VXSE53_1.json"
        );
        assert_eq!(entry.maxi.as_deref(), Some("7"));
        assert_eq!(entry.int.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn index_entry_optional_fields_absent() {
        let entry: IndexEntry =
            serde_json::from_str(r#"{"json": "20240102_VXSE52_1.json"}"#).unwrap();
        assert!(entry.int.is_none());
        assert!(entry.maxi.is_none());
    }

    #[test]
    fn basic_document_reads_pascal_case_fields() {
        let json = r#"{
            "Control": {"Title": "震源に関する情報"},
            "Body": {
                "Earthquake": {
                    "OriginTime": "2024-01-02T09:00:00+09:00",
                    "Magnitude": "4.1",
                    "Hypocenter": {"Area": {"Name": "千葉県東方沖", "Code": "350", "Coordinate": "+35.1+140.2-50000/"}}
                },
                "Comments": {"ForecastComment": {"Text": "1", "Code": "0215"}}
            }
        }"#;
        let doc: BasicDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.body.earthquake.hypocenter.area.code, "350");
        assert_eq!(doc.body.comments.forecast_comment.text, "1");
    }
}
