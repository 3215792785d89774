//! Principal and profile domain models.
//!
//! A principal is produced by the external authenticator; this core
//! never owns identity records, only the grants attached to them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Display-only profile data shown in the UI shell. Cleared on logout
/// together with the rest of the session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub full_name: String,
    pub locale: String,
}
