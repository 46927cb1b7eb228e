use crate::domain::{MatchedBy, Participant, PaymentStatus, RegistrationMatch};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

const PLACEHOLDER: &str = "N/A";
const DEFAULT_POSITION: &str = "Participant";
const REGISTERED: &str = "registered";

/// Display projection used by badge and scanner front-ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeCardDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub position: String,
    pub gender: String,
    pub education: String,
    pub domain: String,
    pub experience: String,
    pub registration_date: String,
    pub status: String,
}

impl From<&Participant> for BadgeCardDto {
    fn from(participant: &Participant) -> Self {
        let or_placeholder = |value: Option<&str>| value.unwrap_or(PLACEHOLDER).to_string();
        let domain = participant.expertise_domain.as_deref();

        Self {
            id: participant.id.as_i64(),
            name: participant.display_name(),
            email: participant.email.clone(),
            phone: or_placeholder(participant.phone.as_deref()),
            company: or_placeholder(participant.company.as_deref().or(domain)),
            position: participant
                .position
                .as_deref()
                .or(domain)
                .unwrap_or(DEFAULT_POSITION)
                .to_string(),
            gender: or_placeholder(participant.gender.map(|gender| gender.as_str())),
            education: or_placeholder(participant.degree.as_deref()),
            domain: or_placeholder(domain),
            experience: participant
                .years_of_experience
                .map(|years| years.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            registration_date: format_timestamp(participant.created_at),
            status: REGISTERED.to_string(),
        }
    }
}

/// Renders unix seconds as RFC 3339 in UTC.
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationCheckDto {
    pub is_registered: bool,
    pub participant: Option<BadgeCardDto>,
    pub matched_by: Option<MatchedBy>,
}

impl From<&RegistrationMatch> for RegistrationCheckDto {
    fn from(value: &RegistrationMatch) -> Self {
        match value {
            RegistrationMatch::Found {
                participant,
                matched_by,
            } => Self {
                is_registered: true,
                participant: Some(BadgeCardDto::from(participant.as_ref())),
                matched_by: Some(*matched_by),
            },
            RegistrationMatch::NotFound => Self {
                is_registered: false,
                participant: None,
                matched_by: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBucket {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStats {
    pub total: i64,
    pub with_phone: i64,
    pub by_gender: Vec<CountBucket>,
    pub by_expertise_domain: Vec<CountBucket>,
    pub by_degree: Vec<CountBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummaryDto {
    pub status: PaymentStatus,
    pub count: i64,
    pub total_amount: f64,
}
