use crate::batch::{drafts_from_records, ParsedImport};
use roster_core::domain::PhonePolicy;
use roster_core::fields::RawRecord;

/// Converts rows read from an older scanner, badge or form database.
pub fn drafts_from_rows(rows: &[RawRecord], policy: &PhonePolicy) -> ParsedImport {
    drafts_from_records(rows.iter().enumerate(), policy)
}
