use crate::batch::{drafts_from_records, ParsedImport};
use crate::error::{ImportError, Result};
use roster_core::domain::PhonePolicy;
use serde_json::Value;

/// Parses a spreadsheet export: a JSON array with one object per answer.
///
/// Non-object entries are counted as skipped.
pub fn parse_participants(data: &str, policy: &PhonePolicy) -> Result<ParsedImport> {
    let value: Value = serde_json::from_str(data)?;
    let Value::Array(entries) = value else {
        return Err(ImportError::Parse(
            "expected a JSON array of participant objects".to_string(),
        ));
    };

    let mut non_objects = Vec::new();
    let records = entries.iter().enumerate().filter_map(|(index, entry)| match entry {
        Value::Object(record) => Some((index, record)),
        _ => {
            non_objects.push(index + 1);
            None
        }
    });
    let mut parsed = drafts_from_records(records, policy);

    parsed.skipped += non_objects.len();
    parsed.warnings.extend(
        non_objects
            .into_iter()
            .map(|entry| format!("entry {entry}: skipped, not an object")),
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::parse_participants;
    use roster_core::domain::{Gender, PhonePolicy};

    #[test]
    fn parse_spreadsheet_export() {
        let data = r#"[
            {
                "Horodateur": "2024/05/01 10:00:00",
                "Nom complet": "Marie Kabila",
                "Email": "Marie@Example.com ",
                "Contact Number": "0991234567",
                "Genre": "Féminin",
                "Veuillez sélectionner votre domaine d'expertise": "Finance"
            },
            {
                "Nom complet": "Sans Email",
                "Contact Number": "0812222222"
            },
            {
                "Nom complet": "Doublon",
                "Email": "marie@example.com"
            },
            42
        ]"#;

        let parsed = parse_participants(data, &PhonePolicy::default()).expect("parse");
        assert_eq!(parsed.drafts.len(), 1);
        assert_eq!(parsed.skipped, 3);

        let draft = &parsed.drafts[0];
        assert_eq!(draft.email.as_deref(), Some("marie@example.com"));
        assert_eq!(draft.phone.as_deref(), Some("+243991234567"));
        assert_eq!(draft.gender, Some(Gender::Female));
        assert_eq!(draft.expertise_domain.as_deref(), Some("Finance"));
        assert_eq!(draft.submitted_at.as_deref(), Some("2024/05/01 10:00:00"));

        assert!(parsed
            .warnings
            .iter()
            .any(|warning| warning == "entry 3: skipped, duplicate email marie@example.com"));
        assert!(parsed
            .warnings
            .iter()
            .any(|warning| warning == "entry 4: skipped, not an object"));
    }

    #[test]
    fn parse_rejects_non_array() {
        let err = parse_participants("{\"email\": \"a@b.cd\"}", &PhonePolicy::default())
            .expect_err("object is not an export");
        assert!(err.to_string().contains("expected a JSON array"));

        assert!(parse_participants("not json", &PhonePolicy::default()).is_err());
    }

    #[test]
    fn parse_uses_configured_country_code() {
        let policy = PhonePolicy::new("33", &[]).expect("policy");
        let parsed =
            parse_participants(r#"[{"email": "a@b.fr", "telephone": "0612345678"}]"#, &policy)
                .expect("parse");
        assert_eq!(parsed.drafts[0].phone.as_deref(), Some("+33612345678"));
    }
}
