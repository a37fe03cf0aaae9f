//! Projection of canonical records into a display language.
//!
//! Three dictionaries map official codes to per-language names:
//!
//! | field                | dictionary |
//! |----------------------|------------|
//! | `location.code`      | epicenter  |
//! | `regions.pref_code`  | prefecture |
//! | `areas.area_code`    | epicenter  |
//! | `cities.city_code`   | city       |
//!
//! Area codes share the epicenter table upstream; there is no area table.
//! Any miss (unknown code, missing language, empty name) falls back to the
//! raw code, so translation never fails and never drops a record.
//!
//! Translated views only implement `Serialize`. They cannot be fed back into
//! [`translate`], which takes canonical records only.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::quake::{
    Area, BasicEarthquake, City, Comments, DetailedEarthquake, Location, Region, Snapshot,
};

/// `code → dictionary language → display name`.
pub type Dictionary = HashMap<String, HashMap<String, String>>;

/// The epicenter, prefecture, and city dictionaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dictionaries {
    pub epi: Dictionary,
    pub pref: Dictionary,
    pub city: Dictionary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedLocation {
    pub code: String,
    pub coordinate: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedCity {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedArea {
    pub name: String,
    pub cities: Vec<TranslatedCity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedRegion {
    pub prefecture: String,
    pub areas: Vec<TranslatedArea>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedDetailed {
    pub time: String,
    pub magnitude: String,
    pub max_intensity: String,
    pub location: TranslatedLocation,
    pub regions: Vec<TranslatedRegion>,
    pub comments: Comments,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedBasic {
    pub time: String,
    pub magnitude: String,
    pub location: TranslatedLocation,
    pub comments: Comments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslatedSnapshot {
    pub detailed: Vec<TranslatedDetailed>,
    pub basic: Vec<TranslatedBasic>,
}

impl Dictionaries {
    pub fn epicenter_name(&self, code: &str, lang: &str) -> String {
        lookup(&self.epi, code, lang)
    }

    pub fn prefecture_name(&self, code: &str, lang: &str) -> String {
        lookup(&self.pref, code, lang)
    }

    pub fn city_name(&self, code: &str, lang: &str) -> String {
        lookup(&self.city, code, lang)
    }
}

fn lookup(dict: &Dictionary, code: &str, lang: &str) -> String {
    dict.get(code)
        .and_then(|names| names.get(lang))
        .filter(|name| !name.is_empty())
        .cloned()
        .unwrap_or_else(|| code.to_string())
}

/// Translate a whole snapshot. `lang` is a dictionary language key such as
/// `"english"` (see [`crate::QuakeLanguage::dictionary_key`]).
pub fn translate(snapshot: &Snapshot, lang: &str, dicts: &Dictionaries) -> TranslatedSnapshot {
    TranslatedSnapshot {
        detailed: translate_detailed(&snapshot.detailed, lang, dicts),
        basic: translate_basic(&snapshot.basic, lang, dicts),
    }
}

pub fn translate_detailed(
    quakes: &[DetailedEarthquake],
    lang: &str,
    dicts: &Dictionaries,
) -> Vec<TranslatedDetailed> {
    quakes
        .iter()
        .map(|quake| TranslatedDetailed {
            time: quake.time.clone(),
            magnitude: quake.magnitude.clone(),
            max_intensity: quake.max_intensity.clone(),
            location: translate_location(&quake.location, lang, dicts),
            regions: quake
                .regions
                .iter()
                .map(|region| translate_region(region, lang, dicts))
                .collect(),
            comments: quake.comments,
        })
        .collect()
}

pub fn translate_basic(
    quakes: &[BasicEarthquake],
    lang: &str,
    dicts: &Dictionaries,
) -> Vec<TranslatedBasic> {
    quakes
        .iter()
        .map(|quake| TranslatedBasic {
            time: quake.time.clone(),
            magnitude: quake.magnitude.clone(),
            location: translate_location(&quake.location, lang, dicts),
            comments: quake.comments,
        })
        .collect()
}

fn translate_location(location: &Location, lang: &str, dicts: &Dictionaries) -> TranslatedLocation {
    TranslatedLocation {
        code: location.code.clone(),
        coordinate: location.coordinate.clone(),
        name: dicts.epicenter_name(&location.code, lang),
    }
}

fn translate_region(region: &Region, lang: &str, dicts: &Dictionaries) -> TranslatedRegion {
    TranslatedRegion {
        prefecture: dicts.prefecture_name(&region.pref_code, lang),
        areas: region
            .areas
            .iter()
            .map(|area| translate_area(area, lang, dicts))
            .collect(),
    }
}

fn translate_area(area: &Area, lang: &str, dicts: &Dictionaries) -> TranslatedArea {
    TranslatedArea {
        name: dicts.epicenter_name(&area.area_code, lang),
        cities: area
            .cities
            .iter()
            .map(|city: &City| TranslatedCity {
                name: dicts.city_name(&city.city_code, lang),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(entries: &[(&str, &str, &str)]) -> Dictionary {
        let mut dict = Dictionary::new();
        for (code, lang, name) in entries {
            dict.entry(code.to_string())
                .or_default()
                .insert(lang.to_string(), name.to_string());
        }
        dict
    }

    fn dictionaries() -> Dictionaries {
        Dictionaries {
            epi: dict(&[
                ("390", "english", "Noto, Ishikawa"),
                ("390", "korean", "이시카와현 노토 지방"),
                ("301", "english", "Tokyo 23 Wards"),
            ]),
            pref: dict(&[("17", "english", "Ishikawa"), ("13", "english", "Tokyo")]),
            city: dict(&[
                ("1720400", "english", "Wajima"),
                ("1720400", "korean", ""),
                ("13101", "english", "Chiyoda"),
            ]),
        }
    }

    fn quake(regions: Vec<Region>) -> DetailedEarthquake {
        DetailedEarthquake {
            time: "2024-01-01T16:10:00+09:00".into(),
            magnitude: "7.6".into(),
            max_intensity: "7".into(),
            location: Location {
                code: "390".into(),
                coordinate: "+37.5+137.2-10000/".into(),
            },
            regions,
            comments: Comments {
                has_tsunami_warning: true,
            },
        }
    }

    fn region(pref: &str, area: &str, cities: &[&str]) -> Region {
        Region {
            pref_code: pref.into(),
            areas: vec![Area {
                area_code: area.into(),
                cities: cities
                    .iter()
                    .map(|c| City {
                        city_code: c.to_string(),
                    })
                    .collect(),
            }],
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            detailed: vec![quake(vec![
                region("17", "390", &["1720400", "1746100"]),
                region("13", "301", &["13101"]),
            ])],
            basic: vec![BasicEarthquake {
                time: "2024-01-02T09:00:00+09:00".into(),
                magnitude: "4.1".into(),
                location: Location {
                    code: "350".into(),
                    coordinate: "+35.1+140.2-50000/".into(),
                },
                comments: Comments {
                    has_tsunami_warning: false,
                },
            }],
        }
    }

    #[test]
    fn translates_every_level() {
        let out = translate(&snapshot(), "english", &dictionaries());
        let quake = &out.detailed[0];
        assert_eq!(quake.location.name, "Noto, Ishikawa");
        assert_eq!(quake.location.code, "390");
        assert_eq!(quake.regions[0].prefecture, "Ishikawa");
        // Areas are looked up in the epicenter dictionary.
        assert_eq!(quake.regions[0].areas[0].name, "Noto, Ishikawa");
        assert_eq!(quake.regions[0].areas[0].cities[0].name, "Wajima");
        assert_eq!(quake.regions[1].areas[0].name, "Tokyo 23 Wards");
        assert_eq!(quake.regions[1].areas[0].cities[0].name, "Chiyoda");
    }

    #[test]
    fn missing_codes_fall_back_to_raw_code() {
        let out = translate(&snapshot(), "english", &dictionaries());
        // City absent from the dictionary.
        assert_eq!(out.detailed[0].regions[0].areas[0].cities[1].name, "1746100");
        // Epicenter absent from the dictionary.
        assert_eq!(out.basic[0].location.name, "350");
    }

    #[test]
    fn city_only_in_english_yields_code_for_other_language() {
        let out = translate(&snapshot(), "french", &dictionaries());
        let tokyo = &out.detailed[0].regions[1];
        assert_eq!(tokyo.areas[0].cities[0].name, "13101");
        assert_eq!(tokyo.prefecture, "13");
    }

    #[test]
    fn empty_name_falls_back_to_code() {
        let out = translate(&snapshot(), "korean", &dictionaries());
        let noto = &out.detailed[0].regions[0].areas[0];
        assert_eq!(noto.name, "이시카와현 노토 지방");
        assert_eq!(noto.cities[0].name, "1720400");
    }

    #[test]
    fn empty_dictionaries_are_total() {
        let out = translate(&snapshot(), "english", &Dictionaries::default());
        assert_eq!(out.detailed[0].location.name, "390");
        assert_eq!(out.detailed[0].regions[0].prefecture, "17");
        assert_eq!(out.detailed[0].regions[0].areas[0].cities[0].name, "1720400");
    }

    #[test]
    fn preserves_ordering_and_leaves_input_untouched() {
        let source = snapshot();
        let before = source.clone();
        let out = translate(&source, "english", &dictionaries());
        assert_eq!(source, before);

        let prefs: Vec<&str> = out.detailed[0]
            .regions
            .iter()
            .map(|r| r.prefecture.as_str())
            .collect();
        assert_eq!(prefs, ["Ishikawa", "Tokyo"]);
        let cities: Vec<&str> = out.detailed[0].regions[0].areas[0]
            .cities
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(cities, ["Wajima", "1746100"]);
        assert_eq!(out.detailed[0].comments, before.detailed[0].comments);
    }

    #[test]
    fn translated_view_is_not_a_canonical_snapshot() {
        let out = translate(&snapshot(), "english", &dictionaries());
        let json = serde_json::to_value(&out).unwrap();
        assert!(json["detailed"][0]["regions"][0].get("pref_code").is_none());
        assert!(serde_json::from_value::<Snapshot>(json).is_err());
    }
}
