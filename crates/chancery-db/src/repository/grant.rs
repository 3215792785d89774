//! SurrealDB implementation of [`GrantRepository`].
//!
//! Grants are the two collections the session bootstrap reads: role
//! assignments (principal -> role) and world membership (principal ->
//! world). Role strings and membership world ids are external data;
//! both are validated here, at the boundary, and flagged rather than
//! propagated when invalid.

use chancery_core::error::{ChanceryError, ChanceryResult};
use chancery_core::models::role::Role;
use chancery_core::models::world::World;
use chancery_core::repository::{GrantRepository, WorldRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::warn;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::world::SurrealWorldRepository;

#[derive(Debug, SurrealValue)]
struct RoleAssignmentRow {
    role: String,
}

#[derive(Debug, SurrealValue)]
struct WorldMemberRow {
    world_id: String,
}

/// SurrealDB implementation of the Grant repository.
#[derive(Clone)]
pub struct SurrealGrantRepository<C: Connection> {
    db: Surreal<C>,
    worlds: SurrealWorldRepository<C>,
}

impl<C: Connection> SurrealGrantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        let worlds = SurrealWorldRepository::new(db.clone());
        Self { db, worlds }
    }
}

impl<C: Connection> GrantRepository for SurrealGrantRepository<C> {
    async fn roles_for_principal(&self, principal_id: Uuid) -> ChanceryResult<Vec<Role>> {
        let mut result = self
            .db
            .query("SELECT role FROM role_assignment WHERE principal_id = $principal_id")
            .bind(("principal_id", principal_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleAssignmentRow> = result.take(0).map_err(DbError::from)?;

        // Unknown role strings are flagged and skipped; they never
        // reach the authorization state.
        let mut roles = Vec::with_capacity(rows.len());
        for row in rows {
            match Role::parse(&row.role) {
                Ok(role) => roles.push(role),
                Err(_) => {
                    warn!(
                        principal_id = %principal_id,
                        role = %row.role,
                        "skipping role assignment with unknown role value"
                    );
                }
            }
        }

        Ok(roles)
    }

    async fn worlds_for_principal(&self, principal_id: Uuid) -> ChanceryResult<Vec<World>> {
        let mut result = self
            .db
            .query(
                "SELECT world_id, created_at FROM world_member \
                 WHERE principal_id = $principal_id \
                 ORDER BY created_at ASC",
            )
            .bind(("principal_id", principal_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WorldMemberRow> = result.take(0).map_err(DbError::from)?;

        // Second step of the read-then-enrich pipeline: resolve each
        // membership to its world. Memberships pointing at a missing
        // world are flagged and skipped.
        let mut worlds = Vec::with_capacity(rows.len());
        for row in rows {
            let world_id = match Uuid::parse_str(&row.world_id) {
                Ok(id) => id,
                Err(e) => {
                    warn!(
                        principal_id = %principal_id,
                        world_id = %row.world_id,
                        error = %e,
                        "skipping membership with malformed world id"
                    );
                    continue;
                }
            };
            match self.worlds.get_by_id(world_id).await {
                Ok(world) => worlds.push(world),
                Err(ChanceryError::NotFound { .. }) => {
                    warn!(
                        principal_id = %principal_id,
                        world_id = %world_id,
                        "skipping membership referencing missing world"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(worlds)
    }

    async fn assign_role(&self, principal_id: Uuid, role: Role) -> ChanceryResult<()> {
        self.db
            .query(
                "CREATE role_assignment SET \
                 principal_id = $principal_id, role = $role",
            )
            .bind(("principal_id", principal_id.to_string()))
            .bind(("role", role.as_str()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        Ok(())
    }

    async fn revoke_role(&self, principal_id: Uuid, role: Role) -> ChanceryResult<()> {
        self.db
            .query(
                "DELETE role_assignment \
                 WHERE principal_id = $principal_id AND role = $role",
            )
            .bind(("principal_id", principal_id.to_string()))
            .bind(("role", role.as_str()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn add_world_member(&self, principal_id: Uuid, world_id: Uuid) -> ChanceryResult<()> {
        self.db
            .query(
                "CREATE world_member SET \
                 principal_id = $principal_id, world_id = $world_id",
            )
            .bind(("principal_id", principal_id.to_string()))
            .bind(("world_id", world_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        Ok(())
    }

    async fn remove_world_member(&self, principal_id: Uuid, world_id: Uuid) -> ChanceryResult<()> {
        self.db
            .query(
                "DELETE world_member \
                 WHERE principal_id = $principal_id AND world_id = $world_id",
            )
            .bind(("principal_id", principal_id.to_string()))
            .bind(("world_id", world_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
