//! Session configuration.

/// Configuration for the session service.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime in seconds (default: 28_800 = 8 hours).
    pub session_lifetime_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_lifetime_secs: 28_800,
        }
    }
}
