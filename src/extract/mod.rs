//! Fenced code block extraction from completion text.

use std::sync::LazyLock;

use regex::Regex;

// Non-greedy and dot-matches-newline: the first ```python block wins,
// internal blank lines included. The language tag is matched
// case-sensitively in lowercase.
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```python\n(.*?)```").unwrap());

/// Pull the first `python`-tagged fenced block out of free-form model
/// text. `None` is a normal outcome (the model produced no code), not
/// an error.
pub fn extract_code(text: &str) -> Option<String> {
    FENCE
        .captures(text)
        .map(|caps| caps[1].to_string())
}
