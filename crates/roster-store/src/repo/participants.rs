use crate::error::{Result, StoreError};
use roster_core::domain::{
    is_canonical_phone, normalize_email, Gender, Participant, ParticipantDraft, ParticipantId,
    PhonePolicy, RegistrationMatch, RegistrationQuery,
};
use roster_core::dto::{CountBucket, ParticipantStats};
use roster_core::CoreError;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

const PARTICIPANT_COLUMNS: &str = "id, email, phone, full_name, first_name, middle_name, last_name, gender, date_of_birth, address, degree, institution, graduation_year, position, company, years_of_experience, position_description, expertise_domain, how_heard, expectations, objectives, additional_comments, drink_preference, terms_accepted, data_usage_accepted, future_info_accepted, submitted_at, created_at, updated_at";

const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

// Stored phones are compared with the same characters removed as the query term.
const STRIPPED_PHONE: &str = "REPLACE(REPLACE(REPLACE(REPLACE(REPLACE(phone, ' ', ''), '-', ''), '+', ''), '(', ''), ')', '')";

const UNKNOWN_BUCKET: &str = "Unknown";

/// Why a bulk import left a row out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingEmail,
    InvalidEmail,
    DuplicateEmail,
}

impl SkipReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            SkipReason::MissingEmail => "missing email",
            SkipReason::InvalidEmail => "invalid email",
            SkipReason::DuplicateEmail => "duplicate email",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Position of the row in the imported batch.
    pub index: usize,
    pub email: Option<String>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub created: Vec<ParticipantId>,
    pub skipped: Vec<SkippedRow>,
}

pub struct ParticipantsRepo<'a> {
    conn: &'a Connection,
    phone_policy: &'a PhonePolicy,
}

impl<'a> ParticipantsRepo<'a> {
    pub fn new(conn: &'a Connection, phone_policy: &'a PhonePolicy) -> Self {
        Self { conn, phone_policy }
    }

    pub fn create(&self, now_utc: i64, draft: ParticipantDraft) -> Result<Participant> {
        if self.conn.is_autocommit() {
            let tx = self.conn.unchecked_transaction()?;
            let participant = create_inner(&tx, self.phone_policy, now_utc, draft)?;
            tx.commit()?;
            Ok(participant)
        } else {
            create_inner(self.conn, self.phone_policy, now_utc, draft)
        }
    }

    /// Inserts a batch in one transaction. Rows without a usable email, or
    /// repeating an email already stored or earlier in the batch, are skipped.
    pub fn import(&self, now_utc: i64, drafts: Vec<ParticipantDraft>) -> Result<ImportOutcome> {
        if self.conn.is_autocommit() {
            let tx = self.conn.unchecked_transaction()?;
            let outcome = import_inner(&tx, self.phone_policy, now_utc, drafts)?;
            tx.commit()?;
            Ok(outcome)
        } else {
            import_inner(self.conn, self.phone_policy, now_utc, drafts)
        }
    }

    pub fn get(&self, id: ParticipantId) -> Result<Option<Participant>> {
        let sql = format!("SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = ?1;");
        self.conn
            .query_row(&sql, [id.as_i64()], |row| Ok(participant_from_row(row)))
            .optional()?
            .transpose()
    }

    pub fn get_by_email(&self, email: &str) -> Result<Option<Participant>> {
        let Some(email) = normalize_email(email) else {
            return Ok(None);
        };
        let sql = format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE LOWER(email) = LOWER(?1) LIMIT 1;"
        );
        self.conn
            .query_row(&sql, [email], |row| Ok(participant_from_row(row)))
            .optional()?
            .transpose()
    }

    pub fn list(&self) -> Result<Vec<Participant>> {
        let sql = format!("SELECT {PARTICIPANT_COLUMNS} FROM participants {NEWEST_FIRST};");
        self.collect(&sql, [])
    }

    /// Participants that came through the registration form.
    pub fn list_registrations(&self) -> Result<Vec<Participant>> {
        let sql = format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE degree IS NOT NULL {NEWEST_FIRST};"
        );
        self.collect(&sql, [])
    }

    /// Case-insensitive substring search over names and email.
    pub fn search(&self, term: &str) -> Result<Vec<Participant>> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return self.list();
        }
        let sql = format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants
             WHERE full_name LIKE ?1 ESCAPE '\\'
                OR first_name LIKE ?1 ESCAPE '\\'
                OR middle_name LIKE ?1 ESCAPE '\\'
                OR last_name LIKE ?1 ESCAPE '\\'
                OR email LIKE ?1 ESCAPE '\\'
             {NEWEST_FIRST};"
        );
        let pattern = format!("%{}%", escape_like(trimmed));
        self.collect(&sql, [pattern])
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM participants;", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn stats(&self) -> Result<ParticipantStats> {
        let (total, with_phone) = self.conn.query_row(
            "SELECT COUNT(*), COUNT(CASE WHEN phone IS NOT NULL AND phone <> '' THEN 1 END)
             FROM participants;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(ParticipantStats {
            total,
            with_phone,
            by_gender: self.buckets("gender")?,
            by_expertise_domain: self.buckets("expertise_domain")?,
            by_degree: self.buckets("degree")?,
        })
    }

    /// Single lookup matching either term; email matches sort first.
    pub fn find_registration(&self, query: &RegistrationQuery) -> Result<RegistrationMatch> {
        let sql = format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants
             WHERE (?1 IS NOT NULL AND LOWER(email) = LOWER(?1))
                OR (?2 IS NOT NULL AND phone IS NOT NULL AND instr({STRIPPED_PHONE}, ?2) > 0)
             ORDER BY CASE WHEN ?1 IS NOT NULL AND LOWER(email) = LOWER(?1) THEN 0 ELSE 1 END,
                      id ASC
             LIMIT 1;"
        );
        let found = self
            .conn
            .query_row(&sql, params![query.email(), query.phone_digits()], |row| {
                Ok(participant_from_row(row))
            })
            .optional()?
            .transpose()?;

        Ok(match found {
            Some(participant) => RegistrationMatch::Found {
                matched_by: query.matched_by(&participant),
                participant: Box::new(participant),
            },
            None => RegistrationMatch::NotFound,
        })
    }

    fn buckets(&self, column: &'static str) -> Result<Vec<CountBucket>> {
        let sql = format!(
            "SELECT COALESCE(NULLIF(TRIM({column}), ''), '{UNKNOWN_BUCKET}') AS label, COUNT(*) AS total
             FROM participants
             GROUP BY label
             ORDER BY total DESC, label ASC;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(CountBucket {
                label: row.get(0)?,
                count: row.get(1)?,
            })
        })?;
        let mut buckets = Vec::new();
        for bucket in rows {
            buckets.push(bucket?);
        }
        Ok(buckets)
    }

    fn collect<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Participant>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut participants = Vec::new();
        while let Some(row) = rows.next()? {
            participants.push(participant_from_row(row)?);
        }
        Ok(participants)
    }
}

fn import_inner(
    conn: &Connection,
    phone_policy: &PhonePolicy,
    now_utc: i64,
    drafts: Vec<ParticipantDraft>,
) -> Result<ImportOutcome> {
    let mut outcome = ImportOutcome::default();
    for (index, draft) in drafts.into_iter().enumerate() {
        let email = draft.email.clone();
        let reason = match create_inner(conn, phone_policy, now_utc, draft) {
            Ok(participant) => {
                outcome.created.push(participant.id);
                continue;
            }
            Err(StoreError::Core(CoreError::EmptyEmail)) => SkipReason::MissingEmail,
            Err(StoreError::Core(CoreError::InvalidEmail(_))) => SkipReason::InvalidEmail,
            Err(StoreError::DuplicateEmail(_)) => SkipReason::DuplicateEmail,
            Err(err) => return Err(err),
        };
        outcome.skipped.push(SkippedRow {
            index,
            email,
            reason,
        });
    }
    Ok(outcome)
}

fn create_inner(
    conn: &Connection,
    phone_policy: &PhonePolicy,
    now_utc: i64,
    draft: ParticipantDraft,
) -> Result<Participant> {
    let email = draft
        .email
        .as_deref()
        .and_then(normalize_email)
        .ok_or(CoreError::EmptyEmail)?;

    let mut participant = Participant {
        id: ParticipantId::from_row_id(0),
        email,
        phone: draft
            .phone
            .as_deref()
            .and_then(|phone| canonical_phone(phone_policy, phone)),
        full_name: clean(draft.full_name),
        first_name: clean(draft.first_name),
        middle_name: clean(draft.middle_name),
        last_name: clean(draft.last_name),
        gender: draft.gender,
        date_of_birth: clean(draft.date_of_birth),
        address: clean(draft.address),
        degree: clean(draft.degree),
        institution: clean(draft.institution),
        graduation_year: draft.graduation_year,
        position: clean(draft.position),
        company: clean(draft.company),
        years_of_experience: draft.years_of_experience,
        position_description: clean(draft.position_description),
        expertise_domain: clean(draft.expertise_domain),
        how_heard: clean_list(draft.how_heard),
        expectations: clean_list(draft.expectations),
        objectives: clean(draft.objectives),
        additional_comments: clean(draft.additional_comments),
        drink_preference: clean(draft.drink_preference),
        terms_accepted: draft.terms_accepted,
        data_usage_accepted: draft.data_usage_accepted,
        future_info_accepted: draft.future_info_accepted,
        submitted_at: clean(draft.submitted_at),
        created_at: draft.created_at.unwrap_or(now_utc),
        updated_at: now_utc,
    };

    participant.validate()?;

    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM participants WHERE LOWER(email) = LOWER(?1) LIMIT 1;",
            [&participant.email],
            |row| row.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Err(StoreError::DuplicateEmail(participant.email));
    }

    let inserted = conn.execute(
        "INSERT INTO participants (email, phone, full_name, first_name, middle_name, last_name, gender, date_of_birth, address, degree, institution, graduation_year, position, company, years_of_experience, position_description, expertise_domain, how_heard, expectations, objectives, additional_comments, drink_preference, terms_accepted, data_usage_accepted, future_info_accepted, submitted_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28);",
        params![
            participant.email,
            participant.phone,
            participant.full_name,
            participant.first_name,
            participant.middle_name,
            participant.last_name,
            participant.gender.map(Gender::as_str),
            participant.date_of_birth,
            participant.address,
            participant.degree,
            participant.institution,
            participant.graduation_year,
            participant.position,
            participant.company,
            participant.years_of_experience,
            participant.position_description,
            participant.expertise_domain,
            serde_json::to_string(&participant.how_heard)?,
            serde_json::to_string(&participant.expectations)?,
            participant.objectives,
            participant.additional_comments,
            participant.drink_preference,
            participant.terms_accepted,
            participant.data_usage_accepted,
            participant.future_info_accepted,
            participant.submitted_at,
            participant.created_at,
            participant.updated_at,
        ],
    );

    match inserted {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(failure, _))
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            return Err(StoreError::DuplicateEmail(participant.email));
        }
        Err(err) => return Err(err.into()),
    }

    participant.id = ParticipantId::from_row_id(conn.last_insert_rowid());
    Ok(participant)
}

fn canonical_phone(policy: &PhonePolicy, phone: &str) -> Option<String> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_canonical_phone(trimmed) {
        return Some(trimmed.to_string());
    }
    policy.normalize(trimmed)
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|value| clean(Some(value)))
        .collect()
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn participant_from_row(row: &rusqlite::Row<'_>) -> Result<Participant> {
    let gender: Option<String> = row.get(7)?;
    let gender = match gender {
        Some(value) => Some(Gender::parse(&value).ok_or(StoreError::InvalidStoredValue {
            column: "gender",
            value,
        })?),
        None => None,
    };
    let how_heard: String = row.get(18)?;
    let expectations: String = row.get(19)?;

    Ok(Participant {
        id: ParticipantId::from_row_id(row.get(0)?),
        email: row.get(1)?,
        phone: row.get(2)?,
        full_name: row.get(3)?,
        first_name: row.get(4)?,
        middle_name: row.get(5)?,
        last_name: row.get(6)?,
        gender,
        date_of_birth: row.get(8)?,
        address: row.get(9)?,
        degree: row.get(10)?,
        institution: row.get(11)?,
        graduation_year: row.get(12)?,
        position: row.get(13)?,
        company: row.get(14)?,
        years_of_experience: row.get(15)?,
        position_description: row.get(16)?,
        expertise_domain: row.get(17)?,
        how_heard: serde_json::from_str(&how_heard)?,
        expectations: serde_json::from_str(&expectations)?,
        objectives: row.get(20)?,
        additional_comments: row.get(21)?,
        drink_preference: row.get(22)?,
        terms_accepted: row.get(23)?,
        data_usage_accepted: row.get(24)?,
        future_info_accepted: row.get(25)?,
        submitted_at: row.get(26)?,
        created_at: row.get(27)?,
        updated_at: row.get(28)?,
    })
}
