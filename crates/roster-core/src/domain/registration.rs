use crate::domain::email::normalize_email;
use crate::domain::participant::Participant;
use crate::domain::phone::strip_phone_formatting;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Identity terms for a registration check. At least one term is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationQuery {
    email: Option<String>,
    phone_digits: Option<String>,
}

impl RegistrationQuery {
    pub fn new(email: Option<&str>, phone: Option<&str>) -> Result<Self, CoreError> {
        let email = email.and_then(normalize_email);
        let phone_digits = phone
            .map(strip_phone_formatting)
            .filter(|value| !value.is_empty());
        if email.is_none() && phone_digits.is_none() {
            return Err(CoreError::EmptyLookupQuery);
        }
        Ok(Self {
            email,
            phone_digits,
        })
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Phone term with spaces, dashes, plus signs and parentheses removed.
    pub fn phone_digits(&self) -> Option<&str> {
        self.phone_digits.as_deref()
    }

    /// Which term explains a row returned for this query. Email wins when
    /// both would match.
    pub fn matched_by(&self, participant: &Participant) -> MatchedBy {
        match self.email.as_deref() {
            Some(email) if participant.email.eq_ignore_ascii_case(email) => MatchedBy::Email,
            _ => MatchedBy::Phone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedBy {
    Email,
    Phone,
}

impl MatchedBy {
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchedBy::Email => "email",
            MatchedBy::Phone => "phone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationMatch {
    Found {
        participant: Box<Participant>,
        matched_by: MatchedBy,
    },
    NotFound,
}

impl RegistrationMatch {
    pub fn is_registered(&self) -> bool {
        matches!(self, RegistrationMatch::Found { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchedBy, RegistrationQuery};
    use crate::domain::ids::ParticipantId;
    use crate::domain::participant::Participant;

    fn participant(email: &str) -> Participant {
        Participant {
            id: ParticipantId(1),
            email: email.to_string(),
            phone: Some("+243991234567".to_string()),
            full_name: None,
            first_name: None,
            middle_name: None,
            last_name: None,
            gender: None,
            date_of_birth: None,
            address: None,
            degree: None,
            institution: None,
            graduation_year: None,
            position: None,
            company: None,
            years_of_experience: None,
            position_description: None,
            expertise_domain: None,
            how_heard: Vec::new(),
            expectations: Vec::new(),
            objectives: None,
            additional_comments: None,
            drink_preference: None,
            terms_accepted: false,
            data_usage_accepted: false,
            future_info_accepted: false,
            submitted_at: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn query_requires_a_term() {
        assert!(RegistrationQuery::new(None, None).is_err());
        assert!(RegistrationQuery::new(Some("  "), Some(" - ")).is_err());
    }

    #[test]
    fn query_normalizes_terms() {
        let query =
            RegistrationQuery::new(Some(" Ada@Example.com"), Some("+243 99-123")).expect("query");
        assert_eq!(query.email(), Some("ada@example.com"));
        assert_eq!(query.phone_digits(), Some("24399123"));
    }

    #[test]
    fn email_takes_precedence_in_matched_by() {
        let query = RegistrationQuery::new(Some("ada@example.com"), Some("0991234567"))
            .expect("query");
        assert_eq!(query.matched_by(&participant("ada@example.com")), MatchedBy::Email);
        assert_eq!(query.matched_by(&participant("bob@example.com")), MatchedBy::Phone);
    }
}
