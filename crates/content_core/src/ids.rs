//! Content id shape rules.
//!
//! Ids are dot-separated segments (`<pack>.<local-name>`), each segment
//! starting with a lowercase ASCII letter or digit and continuing with
//! lowercase letters, digits, `-` or `_`.

/// Longest id accepted.
pub const MAX_ID_LENGTH: usize = 128;

/// Suffix of the resource every prestige layer must ship with.
pub const PRESTIGE_COUNT_SUFFIX: &str = "-prestige-count";

/// Check whether `id` has a valid content id shape.
#[must_use]
pub fn is_valid_content_id(id: &str) -> bool {
    if id.is_empty() || id.len() > MAX_ID_LENGTH {
        return false;
    }
    id.split('.').all(is_valid_segment)
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Id of the companion resource counting completions of a prestige layer.
#[must_use]
pub fn prestige_count_resource_id(layer_id: &str) -> String {
    format!("{layer_id}{PRESTIGE_COUNT_SUFFIX}")
}
