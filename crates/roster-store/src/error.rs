use roster_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("invalid data path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("invalid stored value in {column}: {value}")]
    InvalidStoredValue { column: &'static str, value: String },
    #[error("duplicate email: {0}")]
    DuplicateEmail(String),
    #[error("invalid legacy table name: {0}")]
    InvalidTableName(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Io,
    Sql,
    Core,
    Json,
    MissingHomeDir,
    NotFound,
    Migration,
    InvalidDataPath,
    InvalidStoredValue,
    DuplicateEmail,
    InvalidTableName,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Io(_) => StoreErrorKind::Io,
            StoreError::Sql(_) => StoreErrorKind::Sql,
            StoreError::Core(_) => StoreErrorKind::Core,
            StoreError::Json(_) => StoreErrorKind::Json,
            StoreError::MissingHomeDir => StoreErrorKind::MissingHomeDir,
            StoreError::NotFound(_) => StoreErrorKind::NotFound,
            StoreError::Migration(_) => StoreErrorKind::Migration,
            StoreError::InvalidDataPath(_) => StoreErrorKind::InvalidDataPath,
            StoreError::InvalidStoredValue { .. } => StoreErrorKind::InvalidStoredValue,
            StoreError::DuplicateEmail(_) => StoreErrorKind::DuplicateEmail,
            StoreError::InvalidTableName(_) => StoreErrorKind::InvalidTableName,
        }
    }

    /// True for errors caused by the caller's input rather than the database.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            StoreErrorKind::Core
                | StoreErrorKind::DuplicateEmail
                | StoreErrorKind::NotFound
                | StoreErrorKind::InvalidTableName
        )
    }
}
