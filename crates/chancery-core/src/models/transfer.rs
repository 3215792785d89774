//! Transfer domain model and status lifecycle.
//!
//! A transfer records a dossier moving (or being copied) from one
//! world to another. Records are created by the transfer-initiation
//! workflow as `Scheduled` and progress to exactly one of the terminal
//! states; completed and cancelled records are immutable history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ChanceryError;

/// Lifecycle state of a transfer.
///
/// ```text
///         create
/// Scheduled ──────────┐
///    │                 │
///    │ complete        │ cancel
///    ▼                 ▼
/// Completed         Cancelled      (both terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl TransferStatus {
    /// Whether this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStatus::Completed | TransferStatus::Cancelled)
    }

    /// Validate a transition out of this state.
    pub fn check_transition(&self, to: TransferStatus) -> Result<(), ChanceryError> {
        match (self, to) {
            (TransferStatus::Scheduled, TransferStatus::Completed)
            | (TransferStatus::Scheduled, TransferStatus::Cancelled) => Ok(()),
            (from, to) => Err(ChanceryError::InvalidTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            }),
        }
    }

    /// Parse an external status string, rejecting unknown values.
    pub fn parse(s: &str) -> Result<TransferStatus, ChanceryError> {
        match s {
            "Scheduled" => Ok(TransferStatus::Scheduled),
            "Completed" => Ok(TransferStatus::Completed),
            "Cancelled" => Ok(TransferStatus::Cancelled),
            other => Err(ChanceryError::Validation {
                message: format!("unknown transfer status: {other}"),
            }),
        }
    }

    /// Stable storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Scheduled => "Scheduled",
            TransferStatus::Completed => "Completed",
            TransferStatus::Cancelled => "Cancelled",
        }
    }
}

/// A cross-world transfer record.
///
/// `source_dossier_id` and `target_dossier_id` may be equal (the same
/// logical dossier re-homed) or differ (a copy creating a new record
/// in the target world); nothing here assumes either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: Uuid,
    /// Categorical reassignment reason (e.g. `jurisdiction-change`).
    pub transfer_type: String,
    pub status: TransferStatus,
    /// Set when the transfer completes; `None` while scheduled or
    /// after cancellation.
    pub transferred_at: Option<DateTime<Utc>>,
    pub source_dossier_id: Uuid,
    pub target_dossier_id: Uuid,
    pub source_world_id: Uuid,
    pub target_world_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transfer {
    /// A transfer always crosses world boundaries.
    pub fn crosses_worlds(&self) -> bool {
        self.source_world_id != self.target_world_id
    }
}

/// Fields required to schedule a new transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransfer {
    pub transfer_type: String,
    pub source_dossier_id: Uuid,
    pub target_dossier_id: Uuid,
    pub source_world_id: Uuid,
    pub target_world_id: Uuid,
}
