use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase ASCII token for a free-form label.
///
/// Accents are decomposed and dropped, every run of other characters
/// becomes a single `_`, and no `_` is left at either end.
pub fn slugify(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut pending_separator = false;

    for ch in key
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
    {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(ch);
        } else {
            pending_separator = true;
        }
    }

    out
}
