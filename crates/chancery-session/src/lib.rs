//! Chancery Session — session lifecycle orchestration: grant loading
//! at login completion, staleness refresh, and logout.

pub mod config;
pub mod error;
pub mod service;

pub use config::SessionConfig;
pub use error::SessionError;
pub use service::SessionService;
