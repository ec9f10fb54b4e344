// HTTP request handlers
pub mod favorites;
pub mod health;
pub mod indicators;
pub mod reserve;

use axioma_shared::Language;

use crate::server::error::ApiError;

/// Parses the `lang` query parameter. Defaults to English.
fn parse_lang(lang: Option<&str>) -> Result<Language, ApiError> {
    match lang.map(str::trim).filter(|l| !l.is_empty()) {
        Some(code) => code
            .parse::<Language>()
            .map_err(|e| ApiError::bad_request(e.to_string())),
        None => Ok(Language::default()),
    }
}
