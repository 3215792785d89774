//! SurrealDB implementation of [`TransferRepository`].
//!
//! Scheduling validates the cross-world invariant up front; the
//! `complete`/`cancel` transitions re-read the current status and
//! refuse to move a terminal record.

use chancery_core::error::{ChanceryError, ChanceryResult};
use chancery_core::models::transfer::{CreateTransfer, Transfer, TransferStatus};
use chancery_core::repository::TransferRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TransferRow {
    transfer_type: String,
    status: String,
    transferred_at: Option<DateTime<Utc>>,
    source_dossier_id: String,
    target_dossier_id: String,
    source_world_id: String,
    target_world_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TransferRow {
    fn into_transfer(self, id: Uuid) -> Result<Transfer, DbError> {
        Ok(Transfer {
            id,
            transfer_type: self.transfer_type,
            status: parse_status(&self.status)?,
            transferred_at: self.transferred_at,
            source_dossier_id: parse_uuid(&self.source_dossier_id, "source dossier")?,
            target_dossier_id: parse_uuid(&self.target_dossier_id, "target dossier")?,
            source_world_id: parse_uuid(&self.source_world_id, "source world")?,
            target_world_id: parse_uuid(&self.target_world_id, "target world")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TransferRowWithId {
    record_id: String,
    transfer_type: String,
    status: String,
    transferred_at: Option<DateTime<Utc>>,
    source_dossier_id: String,
    target_dossier_id: String,
    source_world_id: String,
    target_world_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TransferRowWithId {
    fn try_into_transfer(self) -> Result<Transfer, DbError> {
        let id = parse_uuid(&self.record_id, "transfer")?;
        Ok(Transfer {
            id,
            transfer_type: self.transfer_type,
            status: parse_status(&self.status)?,
            transferred_at: self.transferred_at,
            source_dossier_id: parse_uuid(&self.source_dossier_id, "source dossier")?,
            target_dossier_id: parse_uuid(&self.target_dossier_id, "target dossier")?,
            source_world_id: parse_uuid(&self.source_world_id, "source world")?,
            target_world_id: parse_uuid(&self.target_world_id, "target world")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Migration(format!("invalid {what} UUID: {e}")))
}

fn parse_status(s: &str) -> Result<TransferStatus, DbError> {
    TransferStatus::parse(s).map_err(|e| DbError::Migration(e.to_string()))
}

/// SurrealDB implementation of the Transfer repository.
#[derive(Clone)]
pub struct SurrealTransferRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTransferRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> ChanceryResult<Transfer> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('transfer', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TransferRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "transfer".into(),
            id: id_str,
        })?;

        Ok(row.into_transfer(id)?)
    }

    /// Apply a terminal transition after validating it against the
    /// record's current status.
    async fn transition(
        &self,
        id: Uuid,
        to: TransferStatus,
        extra_sets: &str,
    ) -> ChanceryResult<Transfer> {
        let current = self.fetch(id).await?;
        current.status.check_transition(to)?;

        let id_str = id.to_string();
        let query = format!(
            "UPDATE type::record('transfer', $id) SET \
             status = $status, updated_at = time::now(){extra_sets}"
        );

        let result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("status", to.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TransferRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "transfer".into(),
            id: id_str,
        })?;

        Ok(row.into_transfer(id)?)
    }
}

impl<C: Connection> TransferRepository for SurrealTransferRepository<C> {
    async fn schedule(&self, input: CreateTransfer) -> ChanceryResult<Transfer> {
        if input.source_world_id == input.target_world_id {
            return Err(ChanceryError::Validation {
                message: "transfer must cross world boundaries".into(),
            });
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('transfer', $id) SET \
                 transfer_type = $transfer_type, \
                 status = 'Scheduled', \
                 source_dossier_id = $source_dossier_id, \
                 target_dossier_id = $target_dossier_id, \
                 source_world_id = $source_world_id, \
                 target_world_id = $target_world_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("transfer_type", input.transfer_type))
            .bind(("source_dossier_id", input.source_dossier_id.to_string()))
            .bind(("target_dossier_id", input.target_dossier_id.to_string()))
            .bind(("source_world_id", input.source_world_id.to_string()))
            .bind(("target_world_id", input.target_world_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TransferRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "transfer".into(),
            id: id_str,
        })?;

        Ok(row.into_transfer(id)?)
    }

    async fn complete(&self, id: Uuid) -> ChanceryResult<Transfer> {
        self.transition(id, TransferStatus::Completed, ", transferred_at = time::now()")
            .await
    }

    async fn cancel(&self, id: Uuid) -> ChanceryResult<Transfer> {
        self.transition(id, TransferStatus::Cancelled, "").await
    }

    async fn get_by_id(&self, id: Uuid) -> ChanceryResult<Transfer> {
        self.fetch(id).await
    }

    async fn list_completed_for_dossier(&self, dossier_id: Uuid) -> ChanceryResult<Vec<Transfer>> {
        let dossier_str = dossier_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM transfer \
                 WHERE (source_dossier_id = $dossier_id \
                        OR target_dossier_id = $dossier_id) \
                   AND status = 'Completed' \
                 ORDER BY transferred_at DESC",
            )
            .bind(("dossier_id", dossier_str))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TransferRowWithId> = result.take(0).map_err(DbError::from)?;

        let transfers = rows
            .into_iter()
            .map(|row| row.try_into_transfer())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(transfers)
    }
}
