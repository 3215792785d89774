//! SurrealDB implementation of [`WorldRepository`].

use chancery_core::error::ChanceryResult;
use chancery_core::models::world::{CreateWorld, ThemeColors, UpdateWorld, World};
use chancery_core::repository::{PaginatedResult, Pagination, WorldRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side representation of the branding triple.
#[derive(Debug, SurrealValue)]
struct ThemeRow {
    primary: String,
    accent: String,
    neutral: String,
}

impl From<ThemeColors> for ThemeRow {
    fn from(theme: ThemeColors) -> Self {
        Self {
            primary: theme.primary,
            accent: theme.accent,
            neutral: theme.neutral,
        }
    }
}

impl From<ThemeRow> for ThemeColors {
    fn from(row: ThemeRow) -> Self {
        Self {
            primary: row.primary,
            accent: row.accent,
            neutral: row.neutral,
        }
    }
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct WorldRow {
    code: String,
    name: String,
    description: String,
    theme: ThemeRow,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WorldRow {
    fn into_world(self, id: Uuid) -> World {
        World {
            id,
            code: self.code,
            name: self.name,
            description: self.description,
            theme: self.theme.into(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct WorldRowWithId {
    record_id: String,
    code: String,
    name: String,
    description: String,
    theme: ThemeRow,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WorldRowWithId {
    fn try_into_world(self) -> Result<World, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid world UUID: {e}")))?;
        Ok(World {
            id,
            code: self.code,
            name: self.name,
            description: self.description,
            theme: self.theme.into(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the World repository.
#[derive(Clone)]
pub struct SurrealWorldRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealWorldRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> WorldRepository for SurrealWorldRepository<C> {
    async fn create(&self, input: CreateWorld) -> ChanceryResult<World> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let theme: ThemeRow = input.theme.unwrap_or_default().into();

        let result = self
            .db
            .query(
                "CREATE type::record('world', $id) SET \
                 code = $code, name = $name, \
                 description = $description, theme = $theme",
            )
            .bind(("id", id_str.clone()))
            .bind(("code", input.code))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("theme", theme))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<WorldRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "world".into(),
            id: id_str,
        })?;

        Ok(row.into_world(id))
    }

    async fn get_by_id(&self, id: Uuid) -> ChanceryResult<World> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('world', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WorldRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "world".into(),
            id: id_str,
        })?;

        Ok(row.into_world(id))
    }

    async fn get_by_code(&self, code: &str) -> ChanceryResult<World> {
        let code_owned = code.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM world \
                 WHERE code = $code",
            )
            .bind(("code", code_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WorldRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "world".into(),
            id: format!("code={code}"),
        })?;

        Ok(row.try_into_world()?)
    }

    async fn update(&self, id: Uuid, input: UpdateWorld) -> ChanceryResult<World> {
        let id_str = id.to_string();

        // `code` is immutable by design and never part of an update.
        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.theme.is_some() {
            sets.push("theme = $theme");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('world', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(theme) = input.theme {
            builder = builder.bind(("theme", ThemeRow::from(theme)));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<WorldRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "world".into(),
            id: id_str,
        })?;

        Ok(row.into_world(id))
    }

    async fn list(&self, pagination: Pagination) -> ChanceryResult<PaginatedResult<World>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM world GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM world \
                 ORDER BY code ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WorldRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_world())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
