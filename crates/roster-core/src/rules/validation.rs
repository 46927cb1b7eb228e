use crate::domain::email::is_valid_email;
use crate::domain::participant::ParticipantDraft;
use thiserror::Error;

/// A problem with a registration form submission.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationIssue {
    #[error("last name is required")]
    MissingLastName,
    #[error("gender is required (M, F or Autre)")]
    MissingGender,
    #[error("email is required")]
    MissingEmail,
    #[error("invalid email format")]
    InvalidEmail,
    #[error("degree is required")]
    MissingDegree,
    #[error("institution is required")]
    MissingInstitution,
    #[error("graduation year is required")]
    MissingGraduationYear,
    #[error("position is required")]
    MissingPosition,
    #[error("please select how you heard about the event")]
    MissingHowHeard,
    #[error("please select your expectations")]
    MissingExpectations,
    #[error("the terms and conditions must be accepted")]
    TermsNotAccepted,
    #[error("the use of personal data must be accepted")]
    DataUsageNotAccepted,
}

/// Checks a form submission and returns every problem found, in form order.
///
/// Bulk imports do not go through this; they only need a valid email.
pub fn validate_registration(draft: &ParticipantDraft) -> Vec<RegistrationIssue> {
    let mut issues = Vec::new();

    if is_blank(draft.last_name.as_deref()) {
        issues.push(RegistrationIssue::MissingLastName);
    }
    if draft.gender.is_none() {
        issues.push(RegistrationIssue::MissingGender);
    }
    match draft.email.as_deref() {
        None => issues.push(RegistrationIssue::MissingEmail),
        Some(email) if email.trim().is_empty() => issues.push(RegistrationIssue::MissingEmail),
        Some(email) if !is_valid_email(email) => issues.push(RegistrationIssue::InvalidEmail),
        Some(_) => {}
    }
    if is_blank(draft.degree.as_deref()) {
        issues.push(RegistrationIssue::MissingDegree);
    }
    if is_blank(draft.institution.as_deref()) {
        issues.push(RegistrationIssue::MissingInstitution);
    }
    if draft.graduation_year.is_none() {
        issues.push(RegistrationIssue::MissingGraduationYear);
    }
    if is_blank(draft.position.as_deref()) {
        issues.push(RegistrationIssue::MissingPosition);
    }
    if draft.how_heard.is_empty() {
        issues.push(RegistrationIssue::MissingHowHeard);
    }
    if draft.expectations.is_empty() {
        issues.push(RegistrationIssue::MissingExpectations);
    }
    if !draft.terms_accepted {
        issues.push(RegistrationIssue::TermsNotAccepted);
    }
    if !draft.data_usage_accepted {
        issues.push(RegistrationIssue::DataUsageNotAccepted);
    }

    issues
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).is_none_or(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::{validate_registration, RegistrationIssue};
    use crate::domain::gender::Gender;
    use crate::domain::participant::ParticipantDraft;

    fn complete() -> ParticipantDraft {
        ParticipantDraft {
            email: Some("jean@example.com".to_string()),
            last_name: Some("Mbala".to_string()),
            gender: Some(Gender::Male),
            degree: Some("Licence".to_string()),
            institution: Some("UNIKIN".to_string()),
            graduation_year: Some(2015),
            position: Some("Analyste".to_string()),
            how_heard: vec!["LinkedIn".to_string()],
            expectations: vec!["Networking".to_string()],
            terms_accepted: true,
            data_usage_accepted: true,
            ..Default::default()
        }
    }

    #[test]
    fn complete_submission_has_no_issues() {
        assert!(validate_registration(&complete()).is_empty());
    }

    #[test]
    fn empty_submission_reports_every_issue_in_order() {
        let issues = validate_registration(&ParticipantDraft::default());
        assert_eq!(issues.first(), Some(&RegistrationIssue::MissingLastName));
        assert_eq!(issues.last(), Some(&RegistrationIssue::DataUsageNotAccepted));
        assert_eq!(issues.len(), 11);
    }

    #[test]
    fn malformed_email_is_reported() {
        let draft = ParticipantDraft {
            email: Some("not-an-email".to_string()),
            ..complete()
        };
        assert_eq!(
            validate_registration(&draft),
            vec![RegistrationIssue::InvalidEmail]
        );
    }

    #[test]
    fn future_info_consent_is_optional() {
        let draft = ParticipantDraft {
            future_info_accepted: false,
            ..complete()
        };
        assert!(validate_registration(&draft).is_empty());
    }
}
