//! Bulletin classification by detail-document name.
//!
//! JMA embeds the telegram type in every detail file name
//! (`<report time>_<event id>_<telegram>_<serial>.json`). Two telegram types
//! are ingested:
//!
//! - `VXSE53` hypocenter and seismic intensity information, with a
//!   prefecture/area/city breakdown
//! - `VXSE52` hypocenter information only
//!
//! Everything else (intensity flash reports, long-period motion, foreign
//! earthquakes, ...) is excluded before any detail fetch.

/// Telegram type carrying a regional intensity breakdown.
pub const DETAILED_TELEGRAM: &str = "VXSE53";

/// Telegram type carrying epicenter information only.
pub const BASIC_TELEGRAM: &str = "VXSE52";

/// Which canonical shape a bulletin normalises into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulletinKind {
    Detailed,
    Basic,
    /// Neither shape applies. Not an error; the entry is skipped.
    Unrecognized,
}

impl BulletinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detailed => "detailed",
            Self::Basic => "basic",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Classify a bulletin from its detail document identifier.
pub fn classify(document_id: &str) -> BulletinKind {
    if document_id.contains(DETAILED_TELEGRAM) {
        BulletinKind::Detailed
    } else if document_id.contains(BASIC_TELEGRAM) {
        BulletinKind::Basic
    } else {
        BulletinKind::Unrecognized
    }
}
