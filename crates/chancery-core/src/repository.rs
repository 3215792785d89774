//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The external record store is
//! consumed exclusively through these traits; the core never talks to
//! a storage engine directly.

use uuid::Uuid;

use crate::error::ChanceryResult;
use crate::models::{
    dossier::{CreateDossier, Dossier},
    role::Role,
    transfer::{CreateTransfer, Transfer},
    world::{CreateWorld, UpdateWorld, World},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Worlds
// ---------------------------------------------------------------------------

/// Read access plus the administrative mutations used by tooling and
/// tests. The core components only ever call the read side.
pub trait WorldRepository: Send + Sync {
    fn create(&self, input: CreateWorld) -> impl Future<Output = ChanceryResult<World>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ChanceryResult<World>> + Send;
    fn get_by_code(&self, code: &str) -> impl Future<Output = ChanceryResult<World>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateWorld,
    ) -> impl Future<Output = ChanceryResult<World>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = ChanceryResult<PaginatedResult<World>>> + Send;
}

// ---------------------------------------------------------------------------
// Dossiers
// ---------------------------------------------------------------------------

pub trait DossierRepository: Send + Sync {
    fn create(&self, input: CreateDossier)
    -> impl Future<Output = ChanceryResult<Dossier>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ChanceryResult<Dossier>> + Send;
}

// ---------------------------------------------------------------------------
// Transfers
// ---------------------------------------------------------------------------

pub trait TransferRepository: Send + Sync {
    /// Record a new transfer in the `Scheduled` state. Rejects
    /// same-world transfers.
    fn schedule(
        &self,
        input: CreateTransfer,
    ) -> impl Future<Output = ChanceryResult<Transfer>> + Send;

    /// Transition `Scheduled -> Completed`, stamping `transferred_at`.
    fn complete(&self, id: Uuid) -> impl Future<Output = ChanceryResult<Transfer>> + Send;

    /// Transition `Scheduled -> Cancelled`.
    fn cancel(&self, id: Uuid) -> impl Future<Output = ChanceryResult<Transfer>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ChanceryResult<Transfer>> + Send;

    /// Every completed transfer where the dossier appears on either
    /// side, most recent first by `transferred_at`. Scheduled and
    /// cancelled records are filtered out store-side.
    fn list_completed_for_dossier(
        &self,
        dossier_id: Uuid,
    ) -> impl Future<Output = ChanceryResult<Vec<Transfer>>> + Send;
}

// ---------------------------------------------------------------------------
// Grants (role assignments + world membership)
// ---------------------------------------------------------------------------

pub trait GrantRepository: Send + Sync {
    fn roles_for_principal(
        &self,
        principal_id: Uuid,
    ) -> impl Future<Output = ChanceryResult<Vec<Role>>> + Send;

    /// The worlds a principal may operate within, resolved from the
    /// membership collection via a second lookup per world. Membership
    /// rows pointing at a missing world are skipped.
    fn worlds_for_principal(
        &self,
        principal_id: Uuid,
    ) -> impl Future<Output = ChanceryResult<Vec<World>>> + Send;

    fn assign_role(
        &self,
        principal_id: Uuid,
        role: Role,
    ) -> impl Future<Output = ChanceryResult<()>> + Send;

    fn revoke_role(
        &self,
        principal_id: Uuid,
        role: Role,
    ) -> impl Future<Output = ChanceryResult<()>> + Send;

    fn add_world_member(
        &self,
        principal_id: Uuid,
        world_id: Uuid,
    ) -> impl Future<Output = ChanceryResult<()>> + Send;

    fn remove_world_member(
        &self,
        principal_id: Uuid,
        world_id: Uuid,
    ) -> impl Future<Output = ChanceryResult<()>> + Send;
}
