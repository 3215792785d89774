//! Session error types.

use chancery_core::error::ChanceryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no active session")]
    NotAuthenticated,

    #[error("session has expired")]
    Expired,
}

impl From<SessionError> for ChanceryError {
    fn from(err: SessionError) -> Self {
        ChanceryError::Session {
            reason: err.to_string(),
        }
    }
}
