//! Session-scoped authorization state.
//!
//! [`AccessControl`] is the central gate for role- and world-scoped
//! authorization decisions. It holds the authenticated principal's
//! role set and accessible worlds for the duration of a session and
//! answers the boolean queries the UI shell consults before rendering
//! privileged surfaces.
//!
//! Authorization here is data-driven, not hierarchical: `SuperAdmin`
//! is a flag checked independently from world membership, so a global
//! surface can be gated purely on role while per-world surfaces are
//! always gated on explicit membership. Callers must not assume a
//! superadmin bypasses world checks — the data model does not
//! guarantee it.
//!
//! The component performs no I/O and cannot fail; staleness relative
//! to the external store is resolved only by a session refresh.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use crate::models::principal::{Principal, Profile};
use crate::models::role::Role;
use crate::models::session::Session;
use crate::models::world::World;

/// The five related fields that make up an authenticated session.
///
/// Cloned out as a unit by [`AccessControl::snapshot`] so consumers
/// needing a consistent multi-field view never observe a torn state.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub principal: Option<Principal>,
    pub session: Option<Session>,
    pub profile: Option<Profile>,
    pub roles: HashSet<Role>,
    pub accessible_worlds: Vec<World>,
}

/// Process-wide authorization state for the current session.
///
/// Owned by the composition root and passed as `Arc<AccessControl>`
/// to every consumer; mutated only by session-lifecycle events (login
/// completion, grant refresh, logout). Every public mutation is a
/// single write-lock critical section, so concurrent readers observe
/// either the pre- or post-mutation state.
#[derive(Debug, Default)]
pub struct AccessControl {
    state: RwLock<SessionState>,
}

impl AccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff the principal's role set contains [`Role::SuperAdmin`].
    pub fn is_super_admin(&self) -> bool {
        self.read().roles.contains(&Role::SuperAdmin)
    }

    /// True iff an accessible world's `code` equals the argument
    /// exactly (case-sensitive). Unknown codes return false; they are
    /// not an error.
    pub fn has_world_access(&self, code: &str) -> bool {
        self.read().accessible_worlds.iter().any(|w| w.code == code)
    }

    /// Cloned snapshot of the full session state.
    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }

    pub fn set_principal(&self, principal: Option<Principal>) {
        self.write().principal = principal;
    }

    pub fn set_session(&self, session: Option<Session>) {
        self.write().session = session;
    }

    pub fn set_profile(&self, profile: Option<Profile>) {
        self.write().profile = profile;
    }

    pub fn set_roles(&self, roles: HashSet<Role>) {
        self.write().roles = roles;
    }

    /// Replace the accessible-world list, deduplicating by world id
    /// (first occurrence wins) to uphold the no-duplicate invariant.
    pub fn set_accessible_worlds(&self, worlds: Vec<World>) {
        self.write().accessible_worlds = dedupe_by_id(worlds);
    }

    /// Replace all five fields in one observable step. Used at login
    /// completion so readers never see a partially installed session.
    pub fn install(&self, mut state: SessionState) {
        state.accessible_worlds = dedupe_by_id(state.accessible_worlds);
        *self.write() = state;
    }

    /// Reset every field to its empty default in one observable step.
    pub fn logout(&self) {
        *self.write() = SessionState::default();
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn dedupe_by_id(worlds: Vec<World>) -> Vec<World> {
    let mut seen = HashSet::new();
    worlds.into_iter().filter(|w| seen.insert(w.id)).collect()
}
