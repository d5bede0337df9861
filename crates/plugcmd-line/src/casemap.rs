//! Case folding for command names.
//!
//! Command names and alias lookups are case-insensitive. Names are folded
//! once at registration time with [`fold`]; tokens typed by a sender are
//! folded the same way before lookup.

/// Fold a string to its lookup form (Unicode lowercase).
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Compare two strings ignoring case.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Check whether `s` starts with `prefix`, ignoring case.
///
/// An empty prefix matches everything.
pub fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    let mut rest = s.chars().flat_map(char::to_lowercase);
    prefix
        .chars()
        .flat_map(char::to_lowercase)
        .all(|p| rest.next() == Some(p))
}
