//! World domain model.
//!
//! A world is a tenant/business line with its own branding and access
//! boundary. Dossiers are owned by exactly one world at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Branding colors for a world. Display-only; no invariant beyond
/// well-formed color values, which administrative tooling validates
/// before they reach this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub accent: String,
    pub neutral: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: "#1f2937".into(),
            accent: "#2563eb".into(),
            neutral: "#9ca3af".into(),
        }
    }
}

/// A world is an isolated business line within the deployment.
///
/// Worlds are created and mutated by administrative tooling; the core
/// only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub id: Uuid,
    /// Short human-readable tag, unique and immutable — the
    /// external-facing discriminator used in URLs and badges.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    pub description: String,
    pub theme: ThemeColors,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal display reference to a world, produced when transfer rows
/// are enriched for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldRef {
    pub code: String,
    pub name: String,
}

impl From<&World> for WorldRef {
    fn from(world: &World) -> Self {
        Self {
            code: world.code.clone(),
            name: world.name.clone(),
        }
    }
}

/// Fields required to create a new world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorld {
    pub code: String,
    pub name: String,
    pub description: String,
    pub theme: Option<ThemeColors>,
}

/// Fields that can be updated on an existing world.
///
/// `code` is immutable once created and deliberately absent here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateWorld {
    pub name: Option<String>,
    pub description: Option<String>,
    pub theme: Option<ThemeColors>,
}
