use chrono::Utc;
use roster_core::domain::{is_valid_email, ParticipantDraft, PhonePolicy};
use roster_core::fields::{map_fields, RawRecord};
use serde::Serialize;
use std::collections::HashSet;

/// Drafts ready for the store plus what was dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct ParsedImport {
    pub drafts: Vec<ParticipantDraft>,
    pub warnings: Vec<String>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub source: String,
    pub created: usize,
    pub skipped: usize,
    /// Payment rows carried over, when a legacy payment table was read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<usize>,
    pub warnings: Vec<String>,
    pub dry_run: bool,
    pub finished_at: i64,
}

impl ImportReport {
    pub fn new(source: impl Into<String>, dry_run: bool) -> Self {
        Self {
            source: source.into(),
            created: 0,
            skipped: 0,
            payments: None,
            warnings: Vec::new(),
            dry_run,
            finished_at: Utc::now().timestamp(),
        }
    }
}

/// Maps every record and keeps the first draft per valid email.
pub(crate) fn drafts_from_records<'a, I>(records: I, policy: &PhonePolicy) -> ParsedImport
where
    I: IntoIterator<Item = (usize, &'a RawRecord)>,
{
    let mut parsed = ParsedImport::default();
    let mut seen = HashSet::new();

    for (position, raw) in records {
        let entry = position + 1;
        let conversion = ParticipantDraft::from_record(&map_fields(raw), policy);
        parsed.warnings.extend(
            conversion
                .warnings
                .into_iter()
                .map(|warning| format!("entry {entry}: {warning}")),
        );

        let draft = conversion.draft;
        let Some(email) = draft.email.clone() else {
            parsed.skipped += 1;
            parsed
                .warnings
                .push(format!("entry {entry}: skipped, no email"));
            continue;
        };
        if !is_valid_email(&email) {
            parsed.skipped += 1;
            parsed
                .warnings
                .push(format!("entry {entry}: skipped, invalid email {email}"));
            continue;
        }
        if !seen.insert(email.clone()) {
            parsed.skipped += 1;
            parsed
                .warnings
                .push(format!("entry {entry}: skipped, duplicate email {email}"));
            continue;
        }
        parsed.drafts.push(draft);
    }

    parsed
}
