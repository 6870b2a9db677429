//! Database-specific error types and conversions.

use recipehub_core::error::HubError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    AlreadyExists { entity: String },
}

impl DbError {
    /// Classify a statement-level error, surfacing unique-index
    /// violations as [`DbError::AlreadyExists`] so callers can report a
    /// conflict instead of a generic failure.
    pub(crate) fn from_statement(entity: &str, err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        if msg.contains("already contains") {
            DbError::AlreadyExists {
                entity: entity.into(),
            }
        } else {
            DbError::Query(msg)
        }
    }
}

impl From<DbError> for HubError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => HubError::NotFound { entity, id },
            DbError::AlreadyExists { entity } => HubError::AlreadyExists { entity },
            other => HubError::Database(other.to_string()),
        }
    }
}
