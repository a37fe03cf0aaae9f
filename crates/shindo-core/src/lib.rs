pub mod classify;
pub mod jma;
pub mod language;
pub mod normalize;
pub mod quake;
pub mod translate;

pub use classify::{BulletinKind, classify};
pub use jma::IndexEntry;
pub use language::QuakeLanguage;
pub use normalize::{RecordError, normalize_basic, normalize_detailed};
pub use quake::{
    Area, BasicEarthquake, City, Comments, DetailedEarthquake, Location, Region, Snapshot,
};
pub use translate::{Dictionaries, Dictionary, TranslatedSnapshot, translate};
