//! Error types for the Chancery system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChanceryError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Invalid transfer transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Unknown role: {value}")]
    UnknownRole { value: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Session error: {reason}")]
    Session { reason: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ChanceryResult<T> = Result<T, ChanceryError>;
