//! Domain models for Chancery.
//!
//! These are the core types shared across all crates.

pub mod dossier;
pub mod principal;
pub mod role;
pub mod session;
pub mod transfer;
pub mod world;
