//! Chancery Core — domain models, world-scoped authorization state,
//! and cross-world transfer lineage classification.
//!
//! This crate defines:
//! - Domain models ([`models`]) and the closed [`models::role::Role`]
//!   enumeration
//! - Error types ([`ChanceryError`], [`ChanceryResult`])
//! - Repository traits over the external record store ([`repository`])
//! - [`AccessControl`] — session-scoped authorization gates
//! - [`TransferLedger`] — per-dossier transfer provenance facts

pub mod access;
pub mod error;
pub mod ledger;
pub mod models;
pub mod repository;

pub use access::{AccessControl, SessionState};
pub use error::{ChanceryError, ChanceryResult};
pub use ledger::{TransferFact, TransferLedger, TransferView};
