//! SurrealDB implementation of [`DossierRepository`].

use chancery_core::error::ChanceryResult;
use chancery_core::models::dossier::{CreateDossier, Dossier};
use chancery_core::repository::DossierRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct DossierRow {
    world_id: String,
    reference: String,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DossierRow {
    fn into_dossier(self, id: Uuid) -> Result<Dossier, DbError> {
        let world_id = Uuid::parse_str(&self.world_id)
            .map_err(|e| DbError::Migration(format!("invalid world UUID: {e}")))?;
        Ok(Dossier {
            id,
            world_id,
            reference: self.reference,
            title: self.title,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Dossier repository.
#[derive(Clone)]
pub struct SurrealDossierRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDossierRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> DossierRepository for SurrealDossierRepository<C> {
    async fn create(&self, input: CreateDossier) -> ChanceryResult<Dossier> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('dossier', $id) SET \
                 world_id = $world_id, \
                 reference = $reference, \
                 title = $title",
            )
            .bind(("id", id_str.clone()))
            .bind(("world_id", input.world_id.to_string()))
            .bind(("reference", input.reference))
            .bind(("title", input.title))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<DossierRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dossier".into(),
            id: id_str,
        })?;

        Ok(row.into_dossier(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> ChanceryResult<Dossier> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('dossier', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DossierRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dossier".into(),
            id: id_str,
        })?;

        Ok(row.into_dossier(id)?)
    }
}
