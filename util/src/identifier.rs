//! Identifier whitelist.
//!
//! Class names and request identifiers end up inside file paths and command
//! lines, so only ASCII letters, digits and underscores are accepted.

use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid identifier regex"));

/// Returns `true` if `name` is non-empty and consists only of `[A-Za-z0-9_]`.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

/// Like [`is_valid_identifier`], but returns a descriptive error naming the field.
pub fn validate_identifier(field: &str, name: &str) -> Result<(), String> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(format!("{field} contains not allowed characters: {name:?}"))
    }
}
