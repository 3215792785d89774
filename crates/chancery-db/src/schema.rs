//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Worlds (business lines / tenants)
-- =======================================================================
DEFINE TABLE world SCHEMAFULL;
DEFINE FIELD code ON TABLE world TYPE string;
DEFINE FIELD name ON TABLE world TYPE string;
DEFINE FIELD description ON TABLE world TYPE string DEFAULT '';
DEFINE FIELD theme ON TABLE world TYPE object;
DEFINE FIELD theme.primary ON TABLE world TYPE string;
DEFINE FIELD theme.accent ON TABLE world TYPE string;
DEFINE FIELD theme.neutral ON TABLE world TYPE string;
DEFINE FIELD created_at ON TABLE world TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE world TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_world_code ON TABLE world COLUMNS code UNIQUE;

-- =======================================================================
-- Dossiers (case files, owned by exactly one world)
-- =======================================================================
DEFINE TABLE dossier SCHEMAFULL;
DEFINE FIELD world_id ON TABLE dossier TYPE string;
DEFINE FIELD reference ON TABLE dossier TYPE string;
DEFINE FIELD title ON TABLE dossier TYPE string;
DEFINE FIELD created_at ON TABLE dossier TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE dossier TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_dossier_world ON TABLE dossier COLUMNS world_id;

-- =======================================================================
-- Transfers (cross-world dossier moves)
-- =======================================================================
DEFINE TABLE transfer SCHEMAFULL;
DEFINE FIELD transfer_type ON TABLE transfer TYPE string;
DEFINE FIELD status ON TABLE transfer TYPE string \
    ASSERT $value IN ['Scheduled', 'Completed', 'Cancelled'];
DEFINE FIELD transferred_at ON TABLE transfer TYPE option<datetime>;
DEFINE FIELD source_dossier_id ON TABLE transfer TYPE string;
DEFINE FIELD target_dossier_id ON TABLE transfer TYPE string;
DEFINE FIELD source_world_id ON TABLE transfer TYPE string;
DEFINE FIELD target_world_id ON TABLE transfer TYPE string;
DEFINE FIELD created_at ON TABLE transfer TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE transfer TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_transfer_source_dossier ON TABLE transfer \
    COLUMNS source_dossier_id;
DEFINE INDEX idx_transfer_target_dossier ON TABLE transfer \
    COLUMNS target_dossier_id;

-- =======================================================================
-- Role assignments (principal -> role, global scope)
-- =======================================================================
DEFINE TABLE role_assignment SCHEMAFULL;
DEFINE FIELD principal_id ON TABLE role_assignment TYPE string;
DEFINE FIELD role ON TABLE role_assignment TYPE string \
    ASSERT $value IN ['SuperAdmin', 'Admin', 'Editor', 'Viewer'];
DEFINE FIELD created_at ON TABLE role_assignment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_assignment_unique ON TABLE role_assignment \
    COLUMNS principal_id, role UNIQUE;

-- =======================================================================
-- World membership (principal -> world)
-- =======================================================================
DEFINE TABLE world_member SCHEMAFULL;
DEFINE FIELD principal_id ON TABLE world_member TYPE string;
DEFINE FIELD world_id ON TABLE world_member TYPE string;
DEFINE FIELD created_at ON TABLE world_member TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_world_member_unique ON TABLE world_member \
    COLUMNS principal_id, world_id UNIQUE;
";

/// Apply any pending schema migrations.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn schema_covers_every_core_collection() {
        for table in [
            "world",
            "dossier",
            "transfer",
            "role_assignment",
            "world_member",
        ] {
            assert!(
                SCHEMA_V1.contains(&format!("DEFINE TABLE {table} ")),
                "missing table {table}"
            );
        }
    }
}
