//! Removal of control characters the DOCX format cannot carry.
//!
//! XML 1.0 forbids most C0 control characters, so text coming out of a
//! presentation must be cleaned before it is written into a document part.
//! Tab, line feed and carriage return are legal and are kept.

use regex::Regex;
use std::sync::LazyLock;

/// Matches U+0000–U+0008, U+000B–U+000C and U+000E–U+001F.
static DISALLOWED_CONTROL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x08\x0B-\x0C\x0E-\x1F]").unwrap());

/// Remove every disallowed control character from `text`.
///
/// All other characters, including whitespace and non-ASCII text, are kept
/// verbatim and in their original order.
pub fn sanitize(text: &str) -> String {
    DISALLOWED_CONTROL_REGEX.replace_all(text, "").into_owned()
}

/// Whether `text` contains any character [`sanitize`] would remove.
pub fn contains_disallowed(text: &str) -> bool {
    DISALLOWED_CONTROL_REGEX.is_match(text)
}
