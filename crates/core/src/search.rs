//! Search-term matching for the public directory.
//!
//! Matching is a plain case-insensitive substring test. There is no ranking:
//! the directory keeps its natural order and only hides what does not match.

/// Normalize a raw search term.
///
/// Surrounding whitespace is trimmed before lowercasing, so `" rust "`
/// matches like `"rust"`. Returns `None` for a blank term, meaning "show
/// everything".
pub fn normalize_term(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Whether `field` contains the already-normalized `needle`.
pub fn field_matches(field: &str, needle: &str) -> bool {
    field.to_lowercase().contains(needle)
}

/// Whether any of the present `fields` contain `needle`.
pub fn any_field_matches<'a, I>(fields: I, needle: &str) -> bool
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    fields
        .into_iter()
        .flatten()
        .any(|field| field_matches(field, needle))
}
