//! Display languages for earthquake bulletins.
//!
//! The route parameter uses ISO 639-1 codes; the translation dictionaries are
//! keyed by JMA's own multilingual table names.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuakeLanguage {
    #[default]
    En,
    Zh,
    Ko,
    Pt,
    Es,
    Vi,
    Th,
    Id,
}

impl QuakeLanguage {
    pub const ALL: [Self; 8] = [
        Self::En,
        Self::Zh,
        Self::Ko,
        Self::Pt,
        Self::Es,
        Self::Vi,
        Self::Th,
        Self::Id,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Resolve an optional route parameter, falling back to English when it is
    /// absent or not one of the supported codes.
    pub fn resolve(code: Option<&str>) -> Self {
        code.and_then(Self::from_code).unwrap_or_default()
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
            Self::Ko => "ko",
            Self::Pt => "pt",
            Self::Es => "es",
            Self::Vi => "vi",
            Self::Th => "th",
            Self::Id => "id",
        }
    }

    /// Language key inside the translation dictionaries.
    pub fn dictionary_key(&self) -> &'static str {
        match self {
            Self::En => "english",
            Self::Zh => "chinese_zs",
            Self::Ko => "korean",
            Self::Pt => "portuguese",
            Self::Es => "spanish",
            Self::Vi => "vietnamese",
            Self::Th => "thai",
            Self::Id => "indonesian",
        }
    }
}
