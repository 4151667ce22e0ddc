//! Node label formatting

/// Marker appended to truncated labels
pub const ELLIPSIS: &str = "...";

/// Shorten `name` to at most `max_chars` characters.
///
/// Names that fit are returned unchanged. Longer names keep their first
/// `max_chars - 3` characters, lose trailing whitespace and gain `...`.
/// A limit too small to hold the marker keeps the first `max_chars`
/// characters without one.
#[must_use]
pub fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    if max_chars <= ELLIPSIS.len() {
        return name.chars().take(max_chars).collect();
    }
    let keep = max_chars - ELLIPSIS.len();
    let head: String = name.chars().take(keep).collect();
    format!("{}{ELLIPSIS}", head.trim_end())
}

/// Hover text for a node: full name plus identifier
#[must_use]
pub fn tooltip(name: &str, cid: &str) -> String {
    format!("{name} [{cid}]")
}
