//! Dossier domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A case file. Owned by exactly one world at any instant; ownership
/// changes only through the transfer workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dossier {
    pub id: Uuid,
    pub world_id: Uuid,
    /// Case reference shown to operators (e.g. `JDE-2024-0193`).
    pub reference: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to open a new dossier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDossier {
    pub world_id: Uuid,
    pub reference: String,
    pub title: String,
}
