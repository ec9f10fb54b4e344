//! Language codes for language-qualified rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language of the display rows (`indicators_lang`, `entities_lang`).
///
/// Stored in the database as a two-letter upper-case code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "EN", alias = "en")]
    En,
    #[serde(rename = "ES", alias = "es")]
    Es,
}

impl Language {
    /// The code stored in the `lang` columns.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Es => "ES",
        }
    }

    /// The PostgreSQL text search configuration used to rank rows in this language.
    pub fn text_search_config(&self) -> &'static str {
        match self {
            Language::En => "english",
            Language::Es => "spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a language code is not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLanguageError(pub String);

impl fmt::Display for ParseLanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported language code: {}", self.0)
    }
}

impl std::error::Error for ParseLanguageError {}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EN" => Ok(Language::En),
            "ES" => Ok(Language::Es),
            _ => Err(ParseLanguageError(s.to_string())),
        }
    }
}
