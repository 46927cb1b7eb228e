use crate::error::CoreError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const DEFAULT_COUNTRY_CODE: &str = "243";
pub const DEFAULT_PRESERVED_COUNTRY_CODES: &[&str] = &["46"];

// Form exports sometimes pack several numbers into one cell.
static MULTI_NUMBER_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[/,;|]|\s+and\s+|\s+ou\s+").expect("phone separator regex")
});

/// Country-code rules applied when canonicalizing phone numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonePolicy {
    default_country_code: String,
    preserved_country_codes: Vec<String>,
}

impl Default for PhonePolicy {
    fn default() -> Self {
        Self {
            default_country_code: DEFAULT_COUNTRY_CODE.to_string(),
            preserved_country_codes: DEFAULT_PRESERVED_COUNTRY_CODES
                .iter()
                .map(|code| code.to_string())
                .collect(),
        }
    }
}

impl PhonePolicy {
    pub fn new(default_country_code: &str, preserved: &[String]) -> Result<Self, CoreError> {
        let default_country_code = parse_country_code(default_country_code)?;
        let mut preserved_country_codes = Vec::with_capacity(preserved.len());
        for code in preserved {
            let code = parse_country_code(code)?;
            if !preserved_country_codes.contains(&code) {
                preserved_country_codes.push(code);
            }
        }
        Ok(Self {
            default_country_code,
            preserved_country_codes,
        })
    }

    pub fn default_country_code(&self) -> &str {
        &self.default_country_code
    }

    pub fn preserved_country_codes(&self) -> &[String] {
        &self.preserved_country_codes
    }

    /// Canonical `+<country><number>` form of the first number in `raw`.
    ///
    /// Numbers dialed (`+` or `00`) with a preserved foreign prefix are kept
    /// as they are.
    /// Everything else is treated as domestic: a trunk `0` is dropped and
    /// the default country code is prepended unless already present.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let first = MULTI_NUMBER_SEPARATOR.split(raw).next()?.trim();
        let cleaned: String = first
            .chars()
            .filter(|ch| ch.is_ascii_digit() || *ch == '+')
            .collect();
        let digits: String = cleaned.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }

        // `00` is the international dialing prefix, same as `+`.
        let (international, digits) =
            if !cleaned.starts_with('+') && digits.len() > 2 && digits.starts_with("00") {
                (true, digits[2..].to_string())
            } else {
                (cleaned.starts_with('+'), digits)
            };

        if international
            && self
                .preserved_country_codes
                .iter()
                .any(|code| digits.starts_with(code.as_str()))
        {
            return Some(format!("+{digits}"));
        }

        let code = self.default_country_code.as_str();
        if digits.starts_with(code) {
            return Some(format!("+{digits}"));
        }
        if digits.len() >= 9 {
            if let Some(rest) = digits.strip_prefix('0') {
                return Some(format!("+{code}{rest}"));
            }
        }
        Some(format!("+{code}{digits}"))
    }
}

pub fn normalize_phone(raw: &str) -> Option<String> {
    PhonePolicy::default().normalize(raw)
}

/// Removes the formatting characters that differ between stored and typed
/// numbers so they can be compared as plain substrings.
pub fn strip_phone_formatting(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_whitespace() && !matches!(ch, '+' | '-' | '(' | ')'))
        .collect()
}

pub fn is_canonical_phone(value: &str) -> bool {
    let Some(rest) = value.strip_prefix('+') else {
        return false;
    };
    !rest.is_empty() && rest.chars().all(|ch| ch.is_ascii_digit())
}

fn parse_country_code(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim().trim_start_matches('+');
    if trimmed.is_empty() || trimmed.len() > 3 || !trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(CoreError::InvalidCountryCode(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
