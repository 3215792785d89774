//! Database-specific error types and conversions.

use chancery_core::error::ChanceryError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for ChanceryError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ChanceryError::NotFound { entity, id },
            // A failed store query surfaces as a retrieval failure so
            // callers can tell "history unknown" from "no history".
            DbError::Surreal(e) => ChanceryError::Retrieval(e.to_string()),
            DbError::Migration(msg) => ChanceryError::Database(msg),
        }
    }
}
