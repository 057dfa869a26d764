//! Row lookups shared by the relational artifact and user stores.
//!
//! [`DbReader`] turns "no such row" into the matching `NotFound` error so
//! that callers only deal with row ids and decoded entities.

use mlte_core::context::{model_key, version_key};
use mlte_core::{Artifact, ArtifactType, Context, User};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Entity, StoreError, StoreResult};

/// An artifact row before its type tag and body are decoded.
struct ArtifactRow {
    identifier: String,
    version: i64,
    artifact_type: String,
    body: String,
}

impl ArtifactRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ArtifactRow {
            identifier: row.get(0)?,
            version: row.get(1)?,
            artifact_type: row.get(2)?,
            body: row.get(3)?,
        })
    }

    fn decode(self) -> StoreResult<Artifact> {
        let kind = ArtifactType::from_tag(&self.artifact_type)
            .map_err(|e| StoreError::internal(format!("stored artifact: {}", e)))?;
        let body = serde_json::from_str(&self.body)?;
        let version = u64::try_from(self.version)
            .map_err(|_| StoreError::internal(format!("negative version {}", self.version)))?;
        Ok(Artifact::new(self.identifier, kind, body).with_version(version))
    }
}

const ARTIFACT_COLUMNS: &str = "identifier, version, artifact_type, body";

/// Lookups against one connection (or transaction).
pub struct DbReader<'c> {
    conn: &'c Connection,
}

impl<'c> DbReader<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        DbReader { conn }
    }

    pub fn namespace_row(&self, namespace_id: &str) -> StoreResult<i64> {
        self.conn
            .prepare_cached("SELECT id FROM namespaces WHERE identifier = ?1")?
            .query_row(params![namespace_id], |row| row.get(0))
            .optional()?
            .ok_or_else(|| StoreError::not_found(Entity::Namespace, namespace_id))
    }

    pub fn model_row(&self, namespace_id: &str, model_id: &str) -> StoreResult<i64> {
        let ns = self.namespace_row(namespace_id)?;
        self.conn
            .prepare_cached("SELECT id FROM models WHERE namespace_id = ?1 AND identifier = ?2")?
            .query_row(params![ns, model_id], |row| row.get(0))
            .optional()?
            .ok_or_else(|| StoreError::not_found(Entity::Model, model_key(namespace_id, model_id)))
    }

    pub fn version_row(
        &self,
        namespace_id: &str,
        model_id: &str,
        version_id: &str,
    ) -> StoreResult<i64> {
        let model = self.model_row(namespace_id, model_id)?;
        self.conn
            .prepare_cached("SELECT id FROM versions WHERE model_id = ?1 AND identifier = ?2")?
            .query_row(params![model, version_id], |row| row.get(0))
            .optional()?
            .ok_or_else(|| {
                StoreError::not_found(
                    Entity::Version,
                    version_key(namespace_id, model_id, version_id),
                )
            })
    }

    pub fn context_row(&self, context: &Context) -> StoreResult<i64> {
        self.version_row(context.namespace(), context.model(), context.version())
    }

    /// Identifiers of the rows of `table` whose `parent_column` is `parent`,
    /// sorted.
    pub fn child_identifiers(
        &self,
        table: &str,
        parent_column: &str,
        parent: i64,
    ) -> StoreResult<Vec<String>> {
        let sql = format!(
            "SELECT identifier FROM {} WHERE {} = ?1 ORDER BY identifier",
            table, parent_column
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let ids = stmt
            .query_map(params![parent], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids)
    }

    pub fn namespace_identifiers(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT identifier FROM namespaces ORDER BY identifier")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids)
    }

    /// Highest stored version of an artifact, if any.
    pub fn max_artifact_version(
        &self,
        version_row: i64,
        artifact_id: &str,
    ) -> StoreResult<Option<i64>> {
        let max = self
            .conn
            .prepare_cached(
                "SELECT MAX(version) FROM artifacts WHERE version_id = ?1 AND identifier = ?2",
            )?
            .query_row(params![version_row, artifact_id], |row| row.get(0))?;
        Ok(max)
    }

    /// One version of an artifact; the highest when `version` is `None`.
    pub fn artifact(
        &self,
        version_row: i64,
        context: &Context,
        artifact_id: &str,
        version: Option<u64>,
    ) -> StoreResult<Artifact> {
        let target = match version {
            Some(v) => i64::try_from(v).ok(),
            None => self.max_artifact_version(version_row, artifact_id)?,
        };
        let not_found =
            || StoreError::not_found(Entity::Artifact, context.artifact_key(artifact_id));
        let target = target.ok_or_else(not_found)?;

        let sql = format!(
            "SELECT {} FROM artifacts WHERE version_id = ?1 AND identifier = ?2 AND version = ?3",
            ARTIFACT_COLUMNS
        );
        self.conn
            .prepare_cached(&sql)?
            .query_row(params![version_row, artifact_id, target], ArtifactRow::from_row)
            .optional()?
            .ok_or_else(not_found)?
            .decode()
    }

    /// The latest version of every artifact under `version_row`, by
    /// identifier, with optional SQL-side pagination.
    pub fn latest_artifacts(
        &self,
        version_row: i64,
        page: Option<(usize, usize)>,
    ) -> StoreResult<Vec<Artifact>> {
        let (limit, offset) = match page {
            Some((limit, offset)) => (
                i64::try_from(limit).unwrap_or(i64::MAX),
                i64::try_from(offset).unwrap_or(i64::MAX),
            ),
            None => (-1, 0),
        };
        let sql = format!(
            "SELECT {} FROM artifacts a \
             WHERE a.version_id = ?1 AND a.version = ( \
                 SELECT MAX(b.version) FROM artifacts b \
                 WHERE b.version_id = a.version_id AND b.identifier = a.identifier) \
             ORDER BY a.identifier LIMIT ?2 OFFSET ?3",
            ARTIFACT_COLUMNS
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(params![version_row, limit, offset], ArtifactRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(ArtifactRow::decode).collect()
    }

    pub fn user(&self, username: &str) -> StoreResult<User> {
        self.conn
            .prepare_cached(
                "SELECT username, email, full_name, hashed_password, disabled \
                 FROM users WHERE username = ?1",
            )?
            .query_row(params![username], |row| {
                Ok(User {
                    username: row.get(0)?,
                    email: row.get(1)?,
                    full_name: row.get(2)?,
                    hashed_password: row.get(3)?,
                    disabled: row.get(4)?,
                })
            })
            .optional()?
            .ok_or_else(|| StoreError::not_found(Entity::User, username))
    }

    pub fn user_exists(&self, username: &str) -> StoreResult<bool> {
        let exists = self
            .conn
            .prepare_cached("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)")?
            .query_row(params![username], |row| row.get(0))?;
        Ok(exists)
    }

    pub fn usernames(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT username FROM users ORDER BY username")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}
