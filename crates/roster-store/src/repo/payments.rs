use crate::error::{Result, StoreError};
use roster_core::domain::{
    validate_payment_amount, ParticipantId, Payment, PaymentId, PaymentStatus,
};
use roster_core::dto::PaymentSummaryDto;
use rusqlite::{params, Connection, OptionalExtension};

#[derive(Debug, Clone)]
pub struct PaymentNew {
    pub participant_id: ParticipantId,
    pub status: PaymentStatus,
    pub amount: f64,
    /// Defaults to the record time for paid entries.
    pub paid_at: Option<i64>,
}

pub struct PaymentsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> PaymentsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn record(&self, now_utc: i64, input: PaymentNew) -> Result<Payment> {
        let amount = validate_payment_amount(input.amount)?;
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM participants WHERE id = ?1;",
                [input.participant_id.as_i64()],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::NotFound(format!(
                "participant {}",
                input.participant_id
            )));
        }

        let paid_at = match input.status {
            PaymentStatus::Paid => Some(input.paid_at.unwrap_or(now_utc)),
            PaymentStatus::Unpaid => None,
        };

        self.conn.execute(
            "INSERT INTO payments (participant_id, status, amount, paid_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                input.participant_id.as_i64(),
                input.status.as_str(),
                amount,
                paid_at,
                now_utc,
                now_utc,
            ],
        )?;

        Ok(Payment {
            id: PaymentId::from_row_id(self.conn.last_insert_rowid()),
            participant_id: input.participant_id,
            status: input.status,
            amount,
            paid_at,
            created_at: now_utc,
            updated_at: now_utc,
        })
    }

    pub fn list_for_participant(&self, participant_id: ParticipantId) -> Result<Vec<Payment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, participant_id, status, amount, paid_at, created_at, updated_at
             FROM payments
             WHERE participant_id = ?1
             ORDER BY created_at DESC, id DESC;",
        )?;
        let mut rows = stmt.query([participant_id.as_i64()])?;
        let mut payments = Vec::new();
        while let Some(row) = rows.next()? {
            payments.push(payment_from_row(row)?);
        }
        Ok(payments)
    }

    /// Count and total amount per status.
    pub fn summary(&self) -> Result<Vec<PaymentSummaryDto>> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*), COALESCE(SUM(amount), 0)
             FROM payments
             GROUP BY status
             ORDER BY status ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut summary = Vec::new();
        while let Some(row) = rows.next()? {
            let status: String = row.get(0)?;
            summary.push(PaymentSummaryDto {
                status: parse_status(status)?,
                count: row.get(1)?,
                total_amount: row.get(2)?,
            });
        }
        Ok(summary)
    }
}

fn parse_status(value: String) -> Result<PaymentStatus> {
    PaymentStatus::parse(&value).map_err(|_| StoreError::InvalidStoredValue {
        column: "status",
        value,
    })
}

fn payment_from_row(row: &rusqlite::Row<'_>) -> Result<Payment> {
    let status: String = row.get(2)?;
    Ok(Payment {
        id: PaymentId::from_row_id(row.get(0)?),
        participant_id: ParticipantId::from_row_id(row.get(1)?),
        status: parse_status(status)?,
        amount: row.get(3)?,
        paid_at: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
