pub mod db;
pub mod error;
pub mod legacy;
pub mod migrate;
pub mod paths;
pub mod repo;

use crate::error::Result;
use roster_core::PhonePolicy;
use rusqlite::Connection;
use std::path::Path;

pub struct Store {
    conn: Connection,
    phone_policy: PhonePolicy,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open(path)?;
        Ok(Self {
            conn,
            phone_policy: PhonePolicy::default(),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self {
            conn,
            phone_policy: PhonePolicy::default(),
        })
    }

    /// Policy used for phone numbers that reach the store un-normalized.
    pub fn with_phone_policy(mut self, policy: PhonePolicy) -> Self {
        self.phone_policy = policy;
        self
    }

    pub fn phone_policy(&self) -> &PhonePolicy {
        &self.phone_policy
    }

    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    /// Closes the connection, reporting any error SQLite returns on close.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_conn, err)| err.into())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn participants(&self) -> repo::ParticipantsRepo<'_> {
        repo::ParticipantsRepo::new(&self.conn, &self.phone_policy)
    }

    pub fn payments(&self) -> repo::PaymentsRepo<'_> {
        repo::PaymentsRepo::new(&self.conn)
    }
}
