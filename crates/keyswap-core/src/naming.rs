//! Identity folder name normalization.

use std::sync::OnceLock;

use regex::Regex;

use crate::store::IDENTITY_PREFIX;

fn case_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("([a-z0-9])([A-Z])").expect("static regex is valid"))
}

/// Convert free text to snake_case.
///
/// Spaces become underscores, an underscore is inserted between a
/// lowercase letter or digit and a following uppercase letter, and the
/// result is lowercased.
pub fn to_snake_case(s: &str) -> String {
    let spaced = s.replace(' ', "_");
    case_boundary()
        .replace_all(&spaced, "${1}_${2}")
        .to_lowercase()
}

/// Normalize user input into an identity folder name (`_<snake_case>`).
pub fn identity_folder_name(input: &str) -> String {
    let name = to_snake_case(input);
    if name.starts_with(IDENTITY_PREFIX) {
        name
    } else {
        format!("{IDENTITY_PREFIX}{name}")
    }
}
