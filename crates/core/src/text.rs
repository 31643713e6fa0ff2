//! Text normalization shared by the field extractors.

use std::sync::LazyLock;

use regex::Regex;

static LEADING_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("static regex"));

/// Trims and collapses inner whitespace runs into single spaces.
pub fn clean(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses the leading base-10 integer of `s`.
///
/// Trailing characters are ignored (`"12."` is 12). Text that does not start
/// with a digit, such as `DNF` or an empty cell, gives `None`.
pub fn parse_place(s: &str) -> Option<i64> {
    LEADING_INT.find(s.trim()).and_then(|m| m.as_str().parse().ok())
}

/// Returns the `n`-th non-empty `/`-delimited segment of a link, ignoring
/// any scheme and host.
///
/// `team/uae-team-emirates-2024` and
/// `https://site/team/uae-team-emirates-2024` both give
/// `uae-team-emirates-2024` for `n = 1`.
pub fn path_segment(href: &str, n: usize) -> Option<&str> {
    let path = match href.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
        None => href,
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.trim_start_matches('/')
        .split('/')
        .nth(n)
        .filter(|segment| !segment.is_empty())
}

/// Returns the `n`-th whitespace-delimited token of a class list.
pub fn class_token(classes: &str, n: usize) -> Option<&str> {
    classes.split_whitespace().nth(n)
}

/// Returns the last whitespace-delimited token of `s`, or an empty string.
pub fn last_token(s: &str) -> &str {
    s.split_whitespace().next_back().unwrap_or_default()
}
