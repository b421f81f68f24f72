//! Input validation utilities

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

use crate::constants;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-]").expect("slug pattern is valid"));

/// Validate programming language
pub fn validate_language(language: &str) -> Result<(), ValidationError> {
    if constants::languages::ALL.contains(&language) {
        Ok(())
    } else {
        Err(ValidationError::new("unsupported_language"))
    }
}

/// Validate every entry of an allowed-languages list
pub fn validate_language_list(languages: &[String]) -> Result<(), ValidationError> {
    languages.iter().try_for_each(|l| validate_language(l))
}

/// Validate problem view mode
pub fn validate_view_mode(view_mode: &str) -> Result<(), ValidationError> {
    if constants::view_modes::ALL.contains(&view_mode) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_view_mode"))
    }
}

/// Turn a problem title into a file-name-safe stem.
///
/// Whitespace runs become `_`, anything outside `[A-Za-z0-9_-]` is dropped,
/// and the result is cut to [`constants::MAX_SLUG_LENGTH`] bytes.
pub fn slugify(title: &str) -> String {
    let joined = title.split_whitespace().collect::<Vec<_>>().join("_");
    let mut slug = NON_SLUG_CHARS.replace_all(&joined, "").into_owned();

    if slug.len() > constants::MAX_SLUG_LENGTH {
        let mut end = constants::MAX_SLUG_LENGTH;
        while !slug.is_char_boundary(end) {
            end -= 1;
        }
        slug.truncate(end);
    }

    if slug.is_empty() {
        "problem".to_string()
    } else {
        slug
    }
}
