use crate::error::{ImportError, Result};
use regex::Regex;
use roster_core::domain::{PhonePolicy, RegistrationQuery};
use std::sync::LazyLock;

pub const INVALID_LOOKUP_INPUT: &str =
    "enter an email address or a phone number (e.g. user@example.com or +243123456789)";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
});

// DR Congo numbers: international prefix or trunk 0, optionally spaced.
static INTERNATIONAL_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+243|00\s?243)\s?[1-9]\d\s?\d{3}\s?\d{2}\s?\d{2}$").expect("phone pattern")
});
static LOCAL_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0\d{2}\s?\d{3}\s?\d{2}\s?\d{2}$").expect("phone pattern")
});

/// What a person typed into the manual check-in field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupInput {
    Email(String),
    Phone(String),
    Invalid,
}

impl LookupInput {
    pub fn into_query(self, policy: &PhonePolicy) -> Result<RegistrationQuery> {
        match self {
            LookupInput::Email(email) => Ok(RegistrationQuery::new(Some(&email), None)?),
            LookupInput::Phone(phone) => {
                let canonical = policy.normalize(&phone).unwrap_or(phone);
                Ok(RegistrationQuery::new(None, Some(&canonical))?)
            }
            LookupInput::Invalid => Err(ImportError::Parse(INVALID_LOOKUP_INPUT.to_string())),
        }
    }
}

pub fn classify_lookup_input(input: &str) -> LookupInput {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return LookupInput::Invalid;
    }
    if EMAIL_PATTERN.is_match(trimmed) {
        return LookupInput::Email(trimmed.to_string());
    }

    let digits = trimmed.chars().filter(char::is_ascii_digit).count();
    let only_number_chars = trimmed
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | ' ' | '-'));
    let is_phone = INTERNATIONAL_PHONE.is_match(trimmed)
        || LOCAL_PHONE.is_match(trimmed)
        || (only_number_chars && trimmed.starts_with("+243") && digits == 12)
        || (only_number_chars && trimmed.starts_with('0') && digits == 10)
        || (only_number_chars && !trimmed.starts_with(['0', '+']) && digits == 9);

    if is_phone {
        LookupInput::Phone(trimmed.to_string())
    } else {
        LookupInput::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_lookup_input, LookupInput};
    use roster_core::domain::PhonePolicy;

    #[test]
    fn classify_emails() {
        assert_eq!(
            classify_lookup_input(" user@example.com "),
            LookupInput::Email("user@example.com".to_string())
        );
        assert_eq!(classify_lookup_input("user@example"), LookupInput::Invalid);
    }

    #[test]
    fn classify_drc_phone_formats() {
        for input in [
            "+243991234567",
            "+243 99 123 45 67",
            "00243991234567",
            "00 243 99 123 45 67",
            "0991234567",
            "099 123 45 67",
            "991234567",
        ] {
            assert_eq!(
                classify_lookup_input(input),
                LookupInput::Phone(input.to_string()),
                "{input}"
            );
        }
    }

    #[test]
    fn classify_rejects_other_input() {
        for input in ["", "hello", "12345", "+33612345678", "abc991234567"] {
            assert_eq!(classify_lookup_input(input), LookupInput::Invalid, "{input}");
        }
    }

    #[test]
    fn phone_query_is_canonicalized() {
        let query = classify_lookup_input("099 123 45 67")
            .into_query(&PhonePolicy::default())
            .expect("query");
        assert_eq!(query.phone_digits(), Some("243991234567"));

        assert!(LookupInput::Invalid
            .into_query(&PhonePolicy::default())
            .is_err());
    }
    #[test]
    fn double_zero_phone_matches_local_registration() {
        let policy = PhonePolicy::default();
        let local = classify_lookup_input("0991234567")
            .into_query(&policy)
            .expect("local query");
        for input in ["00 243 99 123 45 67", "00243991234567"] {
            let query = classify_lookup_input(input)
                .into_query(&policy)
                .expect("query");
            assert_eq!(query.phone_digits(), Some("243991234567"), "{input}");
            assert_eq!(query.phone_digits(), local.phone_digits(), "{input}");
        }
    }
}
