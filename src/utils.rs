use std::borrow::Cow;

/// Trims `input` and collapses every run of whitespace into a single `separator`.
pub fn collapse_whitespace<'a>(input: &'a str, separator: &str) -> Cow<'a, str> {
    let trimmed = input.trim();
    if trimmed.chars().any(|c| c.is_whitespace()) {
        let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(separator);
        Cow::Owned(collapsed)
    } else {
        Cow::Borrowed(trimmed)
    }
}

pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}
