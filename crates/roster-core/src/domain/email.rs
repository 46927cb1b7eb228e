use regex::Regex;
use std::sync::LazyLock;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email shape regex"));

/// Canonical form of an email address: trimmed, lowercased, without the
/// `www.` prefix some spreadsheet exports prepend.
pub fn normalize_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();
    let mut stripped = lowered.as_str();
    while let Some(rest) = stripped.strip_prefix("www.") {
        stripped = rest.trim_start();
    }
    if stripped.is_empty() {
        return None;
    }
    Some(stripped.to_string())
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value.trim())
}

/// Local part of an address, used as a last-resort display name.
pub fn email_local_part(email: &str) -> Option<&str> {
    let local = email.split('@').next()?.trim();
    if local.is_empty() {
        None
    } else {
        Some(local)
    }
}
