//! Session service — session begin, refresh, and logout orchestration.
//!
//! Authentication itself is external; this service picks up where the
//! authenticator leaves off. Given an authenticated principal it
//! fetches the principal's grants from the store and installs them
//! into [`AccessControl`] so the UI shell can consult the gates.

use std::collections::HashSet;
use std::sync::Arc;

use chancery_core::access::{AccessControl, SessionState};
use chancery_core::error::ChanceryResult;
use chancery_core::models::principal::{Principal, Profile};
use chancery_core::models::session::Session;
use chancery_core::repository::GrantRepository;
use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::SessionError;

/// Session lifecycle service.
///
/// Generic over the grant repository so the session layer has no
/// dependency on the database crate.
pub struct SessionService<G: GrantRepository> {
    grants: G,
    access: Arc<AccessControl>,
    config: SessionConfig,
}

impl<G: GrantRepository> SessionService<G> {
    pub fn new(grants: G, access: Arc<AccessControl>, config: SessionConfig) -> Self {
        Self {
            grants,
            access,
            config,
        }
    }

    /// Complete a login: fetch the principal's roles and accessible
    /// worlds and install the full session in one observable step.
    ///
    /// If either grant fetch fails nothing is installed — the session
    /// state keeps whatever it held before the call.
    pub async fn begin(
        &self,
        principal: Principal,
        profile: Option<Profile>,
    ) -> ChanceryResult<Session> {
        let roles = self.grants.roles_for_principal(principal.id).await?;
        let worlds = self.grants.worlds_for_principal(principal.id).await?;

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            principal_id: principal.id,
            started_at: now,
            expires_at: now + Duration::seconds(self.config.session_lifetime_secs as i64),
        };

        info!(
            principal_id = %principal.id,
            session_id = %session.id,
            roles = roles.len(),
            worlds = worlds.len(),
            "Session started"
        );

        self.access.install(SessionState {
            principal: Some(principal),
            session: Some(session.clone()),
            profile,
            roles: roles.into_iter().collect::<HashSet<_>>(),
            accessible_worlds: worlds,
        });

        Ok(session)
    }

    /// Re-fetch the current principal's grants and apply them,
    /// resolving any staleness relative to the store.
    ///
    /// An expired session is logged out instead of refreshed.
    pub async fn refresh(&self) -> ChanceryResult<()> {
        let state = self.access.snapshot();
        let principal = state.principal.ok_or(SessionError::NotAuthenticated)?;
        let session = state.session.ok_or(SessionError::NotAuthenticated)?;

        if session.expires_at <= Utc::now() {
            self.access.logout();
            return Err(SessionError::Expired.into());
        }

        let roles = self.grants.roles_for_principal(principal.id).await?;
        let worlds = self.grants.worlds_for_principal(principal.id).await?;

        self.access.set_roles(roles.into_iter().collect::<HashSet<_>>());
        self.access.set_accessible_worlds(worlds);

        Ok(())
    }

    /// Tear down the session: every authorization field resets to its
    /// empty default in a single observable step.
    pub fn end(&self) {
        if let Some(session) = self.access.snapshot().session {
            info!(session_id = %session.id, "Session ended");
        }
        self.access.logout();
    }
}
