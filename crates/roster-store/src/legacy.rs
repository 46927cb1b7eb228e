//! Row access to databases written by earlier versions of the event tools.

use crate::db;
use crate::error::{Result, StoreError};
use crate::repo::PaymentNew;
use crate::Store;
use roster_core::domain::PaymentStatus;
use roster_core::{parse_timestamp, RawRecord};
use rusqlite::types::ValueRef;
use rusqlite::OptionalExtension;
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_TABLE: &str = "participants";
pub const DEFAULT_PAYMENTS_TABLE: &str = "paiement";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentMigration {
    pub recorded: usize,
    pub warnings: Vec<String>,
}

/// Reads every row of `table` as a column name to JSON value map.
///
/// The database is opened read-only. Blob columns are returned as null.
pub fn read_rows(path: &Path, table: &str) -> Result<Vec<RawRecord>> {
    if !is_plain_identifier(table) {
        return Err(StoreError::InvalidTableName(table.to_string()));
    }
    if !path.exists() {
        return Err(StoreError::NotFound(path.display().to_string()));
    }

    let conn = db::open_read_only(path)?;
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    if found.is_none() {
        return Err(StoreError::NotFound(format!("table {table}")));
    }

    let mut stmt = conn.prepare(&format!("SELECT * FROM \"{table}\";"))?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut rows = stmt.query([])?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = RawRecord::new();
        for (index, column) in columns.iter().enumerate() {
            record.insert(column.clone(), json_value(row.get_ref(index)?));
        }
        records.push(record);
    }
    Ok(records)
}

/// Copies legacy payment rows onto the participants already in `store`.
///
/// Payment rows point at a registration row through `inscription_id`; the
/// registration's email picks the participant. Rows that cannot be placed
/// are reported as warnings. All rows land in one transaction.
pub fn migrate_payments(
    store: &Store,
    now_utc: i64,
    registrations: &[RawRecord],
    payments: &[RawRecord],
) -> Result<PaymentMigration> {
    let emails: HashMap<i64, &str> = registrations
        .iter()
        .filter_map(|row| Some((integer(row.get("id")?)?, row.get("email")?.as_str()?)))
        .collect();

    let conn = store.connection();
    let tx = if conn.is_autocommit() {
        Some(conn.unchecked_transaction()?)
    } else {
        None
    };

    let mut migration = PaymentMigration::default();
    for (index, row) in payments.iter().enumerate() {
        match place_payment(store, now_utc, &emails, row)? {
            Placement::Recorded => migration.recorded += 1,
            Placement::Skipped(reason) => migration
                .warnings
                .push(format!("payment {}: skipped, {reason}", index + 1)),
        }
    }

    if let Some(tx) = tx {
        tx.commit()?;
    }
    Ok(migration)
}

enum Placement {
    Recorded,
    Skipped(String),
}

fn place_payment(
    store: &Store,
    now_utc: i64,
    emails: &HashMap<i64, &str>,
    row: &RawRecord,
) -> Result<Placement> {
    let Some(inscription) = row.get("inscription_id").and_then(integer) else {
        return Ok(Placement::Skipped("no inscription_id".to_string()));
    };
    let Some(email) = emails.get(&inscription) else {
        return Ok(Placement::Skipped(format!("unknown inscription {inscription}")));
    };
    let Some(participant) = store.participants().get_by_email(email)? else {
        return Ok(Placement::Skipped(format!("no participant for {email}")));
    };

    let status = match row.get("status").and_then(Value::as_str).map(PaymentStatus::parse) {
        Some(Ok(status)) => status,
        _ => return Ok(Placement::Skipped(format!("bad status for {email}"))),
    };
    let Some(amount) = row.get("montant").and_then(number) else {
        return Ok(Placement::Skipped(format!("no amount for {email}")));
    };
    let paid_at = row.get("date_paiement").and_then(parse_timestamp);

    let payment = PaymentNew {
        participant_id: participant.id,
        status,
        amount,
        paid_at,
    };
    match store.payments().record(now_utc, payment) {
        Ok(_) => Ok(Placement::Recorded),
        Err(StoreError::Core(err)) => Ok(Placement::Skipped(format!("{email}: {err}"))),
        Err(err) => Err(err),
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => Value::Null,
        ValueRef::Integer(value) => Value::Number(value.into()),
        ValueRef::Real(value) => Number::from_f64(value).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

#[cfg(test)]
mod tests {
    use super::{integer, is_plain_identifier, number};
    use serde_json::json;

    #[test]
    fn plain_identifiers_only() {
        assert!(is_plain_identifier("participants"));
        assert!(is_plain_identifier("_old_rows2"));
        assert!(!is_plain_identifier("2rows"));
        assert!(!is_plain_identifier("x\"; DROP TABLE y"));
        assert!(!is_plain_identifier(""));
    }

    #[test]
    fn numeric_cells_accept_text() {
        assert_eq!(integer(&json!(7)), Some(7));
        assert_eq!(integer(&json!(" 12 ")), Some(12));
        assert_eq!(integer(&json!(1.5)), None);
        assert_eq!(number(&json!("25.50")), Some(25.5));
        assert_eq!(number(&json!(null)), None);
    }
}
