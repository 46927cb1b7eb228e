use super::{CanonicalField, CanonicalRecord};
use crate::domain::email::normalize_email;
use crate::domain::gender::Gender;
use crate::domain::participant::ParticipantDraft;
use crate::domain::phone::PhonePolicy;
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A draft built from a canonical record plus notes about values that
/// could not be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftConversion {
    pub draft: ParticipantDraft,
    pub warnings: Vec<String>,
}

impl ParticipantDraft {
    pub fn from_record(record: &CanonicalRecord, policy: &PhonePolicy) -> DraftConversion {
        let mut warnings = Vec::new();
        let text = |field| record.get(field).and_then(value_text);

        let email = text(CanonicalField::Email).and_then(|raw| normalize_email(&raw));

        let phone = text(CanonicalField::Phone).and_then(|raw| {
            let normalized = policy.normalize(&raw);
            if normalized.is_none() {
                warnings.push(format!("dropped unparseable phone number: {raw}"));
            }
            normalized
        });

        let gender = text(CanonicalField::Gender).and_then(|raw| {
            let parsed = Gender::parse(&raw);
            if parsed.is_none() {
                warnings.push(format!("unrecognized gender: {raw}"));
            }
            parsed
        });

        let graduation_year = int_field(record, CanonicalField::GraduationYear, &mut warnings);
        let years_of_experience =
            int_field(record, CanonicalField::YearsOfExperience, &mut warnings);

        let terms_accepted = flag_field(record, CanonicalField::TermsAccepted, &mut warnings);
        let data_usage_accepted =
            flag_field(record, CanonicalField::DataUsageAccepted, &mut warnings);
        let future_info_accepted =
            flag_field(record, CanonicalField::FutureInfoAccepted, &mut warnings);

        let created_at = record.get(CanonicalField::CreatedAt).and_then(|value| {
            let parsed = parse_timestamp(value);
            if parsed.is_none() {
                warnings.push(format!("unrecognized created_at: {value}"));
            }
            parsed
        });

        let draft = ParticipantDraft {
            email,
            phone,
            full_name: text(CanonicalField::FullName),
            first_name: text(CanonicalField::FirstName),
            middle_name: text(CanonicalField::MiddleName),
            last_name: text(CanonicalField::LastName),
            gender,
            date_of_birth: text(CanonicalField::DateOfBirth),
            address: text(CanonicalField::Address),
            degree: text(CanonicalField::Degree),
            institution: text(CanonicalField::Institution),
            graduation_year,
            position: text(CanonicalField::Position),
            company: text(CanonicalField::Company),
            years_of_experience,
            position_description: text(CanonicalField::PositionDescription),
            expertise_domain: text(CanonicalField::ExpertiseDomain),
            how_heard: list_field(record, CanonicalField::HowHeard),
            expectations: list_field(record, CanonicalField::Expectations),
            objectives: text(CanonicalField::Objectives),
            additional_comments: text(CanonicalField::AdditionalComments),
            drink_preference: text(CanonicalField::DrinkPreference),
            terms_accepted,
            data_usage_accepted,
            future_info_accepted,
            submitted_at: text(CanonicalField::SubmittedAt),
            created_at,
        };

        DraftConversion { draft, warnings }
    }
}

fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(value) => value.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(value_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Object(_) => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn list_field(record: &CanonicalRecord, field: CanonicalField) -> Vec<String> {
    match record.get(field) {
        Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            // Older databases stored these lists as JSON text.
            if trimmed.starts_with('[') {
                if let Ok(items) = serde_json::from_str::<Vec<Value>>(trimmed) {
                    return items.iter().filter_map(value_text).collect();
                }
            }
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
        Some(other) => value_text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

fn int_field(
    record: &CanonicalRecord,
    field: CanonicalField,
    warnings: &mut Vec<String>,
) -> Option<i32> {
    let value = record.get(field)?;
    let parsed = match value {
        Value::Number(number) => number.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(raw) if raw.trim().is_empty() => return None,
        Value::String(raw) => raw.trim().parse::<i32>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        warnings.push(format!("non-numeric {}: {value}", field.as_str()));
    }
    parsed
}

fn flag_field(record: &CanonicalRecord, field: CanonicalField, warnings: &mut Vec<String>) -> bool {
    let Some(value) = record.get(field) else {
        return false;
    };
    let parsed = match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "oui" | "yes" | "1" | "on" => Some(true),
            "false" | "non" | "no" | "0" | "off" | "" => Some(false),
            _ => None,
        },
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        warnings.push(format!("unrecognized {}: {value}", field.as_str()));
        false
    })
}

/// Unix seconds from a number, an RFC 3339 string or the
/// `YYYY-MM-DD HH:MM:SS` text SQLite writes for `CURRENT_TIMESTAMP` (UTC).
pub fn parse_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
                return Some(parsed.timestamp());
            }
            NaiveDateTime::parse_from_str(raw, LEGACY_TIMESTAMP_FORMAT)
                .ok()
                .map(|parsed| parsed.and_utc().timestamp())
        }
        _ => None,
    }
}
