use crate::domain::email::{email_local_part, is_valid_email};
use crate::domain::gender::Gender;
use crate::domain::ids::ParticipantId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

const FALLBACK_DISPLAY_NAME: &str = "Participant";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub email: String,
    pub phone: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub graduation_year: Option<i32>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub years_of_experience: Option<i32>,
    pub position_description: Option<String>,
    pub expertise_domain: Option<String>,
    pub how_heard: Vec<String>,
    pub expectations: Vec<String>,
    pub objectives: Option<String>,
    pub additional_comments: Option<String>,
    pub drink_preference: Option<String>,
    pub terms_accepted: bool,
    pub data_usage_accepted: bool,
    pub future_info_accepted: bool,
    pub submitted_at: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Participant {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.email.trim().is_empty() {
            return Err(CoreError::EmptyEmail);
        }
        if !is_valid_email(&self.email) {
            return Err(CoreError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }

    pub fn display_name(&self) -> String {
        display_name(
            self.full_name.as_deref(),
            [
                self.first_name.as_deref(),
                self.middle_name.as_deref(),
                self.last_name.as_deref(),
            ],
            Some(&self.email),
        )
    }
}

/// Typed participant fields before the store assigns an id.
///
/// Produced by the field mapper for form submissions and imports, or built
/// directly by callers that already have typed values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantDraft {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub graduation_year: Option<i32>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub years_of_experience: Option<i32>,
    pub position_description: Option<String>,
    pub expertise_domain: Option<String>,
    pub how_heard: Vec<String>,
    pub expectations: Vec<String>,
    pub objectives: Option<String>,
    pub additional_comments: Option<String>,
    pub drink_preference: Option<String>,
    pub terms_accepted: bool,
    pub data_usage_accepted: bool,
    pub future_info_accepted: bool,
    pub submitted_at: Option<String>,
    /// Creation time carried over from a legacy source.
    pub created_at: Option<i64>,
}

impl ParticipantDraft {
    pub fn display_name(&self) -> String {
        display_name(
            self.full_name.as_deref(),
            [
                self.first_name.as_deref(),
                self.middle_name.as_deref(),
                self.last_name.as_deref(),
            ],
            self.email.as_deref(),
        )
    }
}

fn display_name(full_name: Option<&str>, parts: [Option<&str>; 3], email: Option<&str>) -> String {
    if let Some(full) = full_name.map(str::trim).filter(|value| !value.is_empty()) {
        return full.to_string();
    }

    let joined = parts
        .iter()
        .flatten()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !joined.is_empty() {
        return joined;
    }

    email
        .and_then(email_local_part)
        .unwrap_or(FALLBACK_DISPLAY_NAME)
        .to_string()
}
