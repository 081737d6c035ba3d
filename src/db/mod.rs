pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Stored JSON is unreadable: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DatabaseError {
    /// Reclassify a UNIQUE/FK failure from an insert or update so callers
    /// can report it as a conflict instead of a storage fault.
    pub(crate) fn from_write(err: rusqlite::Error, context: &str) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let detail = msg.as_deref().unwrap_or("constraint failed");
                DatabaseError::ConstraintViolation(format!("{context}: {detail}"))
            }
            _ => DatabaseError::Sqlite(err),
        }
    }
}
