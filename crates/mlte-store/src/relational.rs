//! Relational backend on SQLite.
//!
//! The schema is migrated once when the store is built. Every session opens
//! its own connection; mutating operations run inside an immediate
//! transaction, so concurrent writers serialize on the database lock instead
//! of racing on `MAX(version)`.

use std::path::{Path, PathBuf};

use mlte_core::context::{model_key, version_key};
use mlte_core::{
    Artifact, Context, Model, ModelCreate, Namespace, NamespaceCreate, Query, User, Version,
    VersionCreate,
};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use tracing::{debug, info};

use crate::error::{Entity, StoreError, StoreResult};
use crate::reader::DbReader;
use crate::schema::{open_connection, open_database};
use crate::traits::{Store, StoreSession, UserStore, UserStoreSession};
use crate::uri::StoreUri;

/// Extracts the database path of a `sqlite://` URI.
fn sqlite_path(uri: &StoreUri) -> StoreResult<PathBuf> {
    if uri.scheme() != "sqlite" {
        return Err(StoreError::invalid_uri(
            uri.as_str(),
            format!("no database driver for '{}'", uri.scheme()),
        ));
    }
    match uri.remainder() {
        "" => Err(StoreError::invalid_uri(uri.as_str(), "missing database path")),
        ":memory:" => Err(StoreError::invalid_uri(
            uri.as_str(),
            "in-memory databases are not shared between sessions",
        )),
        path => Ok(PathBuf::from(path)),
    }
}

fn immediate(conn: &mut Connection) -> StoreResult<Transaction<'_>> {
    Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}

// ---------------------------------------------------------------------------
// Artifact store
// ---------------------------------------------------------------------------

/// An artifact store backed by a SQLite database file.
#[derive(Debug, Clone)]
pub struct RelationalStore {
    uri: StoreUri,
    path: PathBuf,
}

impl RelationalStore {
    /// Opens the database named by a `sqlite://<path>` URI, creating and
    /// migrating it if needed.
    pub fn new(uri: StoreUri) -> StoreResult<Self> {
        let path = sqlite_path(&uri)?;
        open_database(&path)?;
        info!(path = %path.display(), "opened relational artifact store");
        Ok(RelationalStore { uri, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for RelationalStore {
    fn uri(&self) -> &StoreUri {
        &self.uri
    }

    fn session(&self) -> StoreResult<Box<dyn StoreSession + '_>> {
        let conn = open_connection(&self.path)?;
        Ok(Box::new(RelationalSession { conn }))
    }
}

/// A session owning one database connection, closed on drop.
pub struct RelationalSession {
    conn: Connection,
}

impl RelationalSession {
    fn reader(&self) -> DbReader<'_> {
        DbReader::new(&self.conn)
    }
}

impl StoreSession for RelationalSession {
    fn create_namespace(&mut self, namespace: &NamespaceCreate) -> StoreResult<Namespace> {
        namespace.validate()?;
        let tx = immediate(&mut self.conn)?;
        match DbReader::new(&tx).namespace_row(&namespace.identifier) {
            Ok(_) => {
                return Err(StoreError::already_exists(
                    Entity::Namespace,
                    &namespace.identifier,
                ))
            }
            Err(err) if !err.is_not_found() => return Err(err),
            Err(_) => {}
        }
        tx.execute(
            "INSERT INTO namespaces (identifier) VALUES (?1)",
            params![namespace.identifier],
        )?;
        tx.commit()?;
        debug!(namespace = %namespace.identifier, "created namespace");
        Ok(Namespace {
            identifier: namespace.identifier.clone(),
            models: Vec::new(),
        })
    }

    fn read_namespace(&self, namespace_id: &str) -> StoreResult<Namespace> {
        let reader = self.reader();
        let row = reader.namespace_row(namespace_id)?;
        Ok(Namespace {
            identifier: namespace_id.to_string(),
            models: reader.child_identifiers("models", "namespace_id", row)?,
        })
    }

    fn list_namespaces(&self) -> StoreResult<Vec<String>> {
        self.reader().namespace_identifiers()
    }

    fn delete_namespace(&mut self, namespace_id: &str) -> StoreResult<Namespace> {
        let tx = immediate(&mut self.conn)?;
        let reader = DbReader::new(&tx);
        let row = reader.namespace_row(namespace_id)?;
        let namespace = Namespace {
            identifier: namespace_id.to_string(),
            models: reader.child_identifiers("models", "namespace_id", row)?,
        };
        tx.execute("DELETE FROM namespaces WHERE id = ?1", params![row])?;
        tx.commit()?;
        debug!(namespace = %namespace_id, "deleted namespace");
        Ok(namespace)
    }

    fn create_model(&mut self, namespace_id: &str, model: &ModelCreate) -> StoreResult<Model> {
        model.validate()?;
        let tx = immediate(&mut self.conn)?;
        let reader = DbReader::new(&tx);
        let ns = reader.namespace_row(namespace_id)?;
        if reader
            .child_identifiers("models", "namespace_id", ns)?
            .contains(&model.identifier)
        {
            return Err(StoreError::already_exists(
                Entity::Model,
                model_key(namespace_id, &model.identifier),
            ));
        }
        tx.execute(
            "INSERT INTO models (namespace_id, identifier) VALUES (?1, ?2)",
            params![ns, model.identifier],
        )?;
        tx.commit()?;
        Ok(Model {
            identifier: model.identifier.clone(),
            versions: Vec::new(),
        })
    }

    fn read_model(&self, namespace_id: &str, model_id: &str) -> StoreResult<Model> {
        let reader = self.reader();
        let row = reader.model_row(namespace_id, model_id)?;
        Ok(Model {
            identifier: model_id.to_string(),
            versions: reader.child_identifiers("versions", "model_id", row)?,
        })
    }

    fn list_models(&self, namespace_id: &str) -> StoreResult<Vec<String>> {
        let reader = self.reader();
        let row = reader.namespace_row(namespace_id)?;
        reader.child_identifiers("models", "namespace_id", row)
    }

    fn delete_model(&mut self, namespace_id: &str, model_id: &str) -> StoreResult<Model> {
        let tx = immediate(&mut self.conn)?;
        let reader = DbReader::new(&tx);
        let row = reader.model_row(namespace_id, model_id)?;
        let model = Model {
            identifier: model_id.to_string(),
            versions: reader.child_identifiers("versions", "model_id", row)?,
        };
        tx.execute("DELETE FROM models WHERE id = ?1", params![row])?;
        tx.commit()?;
        Ok(model)
    }

    fn create_version(
        &mut self,
        namespace_id: &str,
        model_id: &str,
        version: &VersionCreate,
    ) -> StoreResult<Version> {
        version.validate()?;
        let tx = immediate(&mut self.conn)?;
        let reader = DbReader::new(&tx);
        let model = reader.model_row(namespace_id, model_id)?;
        if reader
            .child_identifiers("versions", "model_id", model)?
            .contains(&version.identifier)
        {
            return Err(StoreError::already_exists(
                Entity::Version,
                version_key(namespace_id, model_id, &version.identifier),
            ));
        }
        tx.execute(
            "INSERT INTO versions (model_id, identifier) VALUES (?1, ?2)",
            params![model, version.identifier],
        )?;
        tx.commit()?;
        Ok(Version {
            identifier: version.identifier.clone(),
        })
    }

    fn read_version(
        &self,
        namespace_id: &str,
        model_id: &str,
        version_id: &str,
    ) -> StoreResult<Version> {
        self.reader().version_row(namespace_id, model_id, version_id)?;
        Ok(Version {
            identifier: version_id.to_string(),
        })
    }

    fn list_versions(&self, namespace_id: &str, model_id: &str) -> StoreResult<Vec<String>> {
        let reader = self.reader();
        let row = reader.model_row(namespace_id, model_id)?;
        reader.child_identifiers("versions", "model_id", row)
    }

    fn delete_version(
        &mut self,
        namespace_id: &str,
        model_id: &str,
        version_id: &str,
    ) -> StoreResult<Version> {
        let tx = immediate(&mut self.conn)?;
        let row = DbReader::new(&tx).version_row(namespace_id, model_id, version_id)?;
        tx.execute("DELETE FROM versions WHERE id = ?1", params![row])?;
        tx.commit()?;
        Ok(Version {
            identifier: version_id.to_string(),
        })
    }

    fn write_artifact(&mut self, context: &Context, artifact: &Artifact) -> StoreResult<Artifact> {
        artifact.validate()?;
        let body = serde_json::to_string(&artifact.body)?;
        let tx = immediate(&mut self.conn)?;
        let reader = DbReader::new(&tx);
        let row = reader.context_row(context)?;
        let next = reader
            .max_artifact_version(row, &artifact.identifier)?
            .map_or(0, |max| max + 1);

        tx.execute(
            "INSERT INTO artifacts (version_id, identifier, version, artifact_type, body) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![row, artifact.identifier, next, artifact.kind.tag(), body],
        )?;
        // The latest write decides the type of every stored version.
        tx.execute(
            "UPDATE artifacts SET artifact_type = ?3 WHERE version_id = ?1 AND identifier = ?2",
            params![row, artifact.identifier, artifact.kind.tag()],
        )?;
        tx.commit()?;

        let assigned = u64::try_from(next)
            .map_err(|_| StoreError::internal(format!("negative version {}", next)))?;
        debug!(
            context = %context,
            artifact = %artifact.identifier,
            version = assigned,
            "inserted artifact row"
        );
        Ok(artifact.clone().with_version(assigned))
    }

    fn read_artifact(
        &self,
        context: &Context,
        artifact_id: &str,
        version: Option<u64>,
    ) -> StoreResult<Artifact> {
        let reader = self.reader();
        let row = reader.context_row(context)?;
        reader.artifact(row, context, artifact_id, version)
    }

    fn read_artifacts(
        &self,
        context: &Context,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Artifact>> {
        let reader = self.reader();
        let row = reader.context_row(context)?;
        reader.latest_artifacts(row, Some((limit, offset)))
    }

    fn search_artifacts(&self, context: &Context, query: &Query) -> StoreResult<Vec<Artifact>> {
        let reader = self.reader();
        let row = reader.context_row(context)?;
        Ok(query.apply(reader.latest_artifacts(row, None)?))
    }

    fn delete_artifact(&mut self, context: &Context, artifact_id: &str) -> StoreResult<Artifact> {
        let tx = immediate(&mut self.conn)?;
        let reader = DbReader::new(&tx);
        let row = reader.context_row(context)?;
        let latest = reader.artifact(row, context, artifact_id, None)?;
        tx.execute(
            "DELETE FROM artifacts WHERE version_id = ?1 AND identifier = ?2",
            params![row, artifact_id],
        )?;
        tx.commit()?;
        Ok(latest)
    }
}

// ---------------------------------------------------------------------------
// User store
// ---------------------------------------------------------------------------

/// A user store in the `users` table of a SQLite database.
#[derive(Debug, Clone)]
pub struct RelationalUserStore {
    uri: StoreUri,
    path: PathBuf,
}

impl RelationalUserStore {
    pub fn new(uri: StoreUri) -> StoreResult<Self> {
        let path = sqlite_path(&uri)?;
        open_database(&path)?;
        Ok(RelationalUserStore { uri, path })
    }

    /// Seeds `user` if the table holds no users yet. Safe to call on every
    /// startup.
    pub fn with_default_user(self, user: &User) -> StoreResult<Self> {
        user.validate()?;
        let mut conn = open_connection(&self.path)?;
        let tx = immediate(&mut conn)?;
        let count: i64 = tx.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        if count == 0 {
            insert_user(&tx, user)?;
            info!(username = %user.username, "seeded default user");
        }
        tx.commit()?;
        Ok(self)
    }
}

fn insert_user(conn: &Connection, user: &User) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO users (username, email, full_name, hashed_password, disabled) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.username,
            user.email,
            user.full_name,
            user.hashed_password,
            user.disabled
        ],
    )?;
    Ok(())
}

impl UserStore for RelationalUserStore {
    fn uri(&self) -> &StoreUri {
        &self.uri
    }

    fn session(&self) -> StoreResult<Box<dyn UserStoreSession + '_>> {
        let conn = open_connection(&self.path)?;
        Ok(Box::new(RelationalUserSession { conn }))
    }
}

pub struct RelationalUserSession {
    conn: Connection,
}

impl UserStoreSession for RelationalUserSession {
    fn create_user(&mut self, user: &User) -> StoreResult<User> {
        user.validate()?;
        let tx = immediate(&mut self.conn)?;
        if DbReader::new(&tx).user_exists(&user.username)? {
            return Err(StoreError::already_exists(Entity::User, &user.username));
        }
        insert_user(&tx, user)?;
        tx.commit()?;
        Ok(user.clone())
    }

    fn read_user(&self, username: &str) -> StoreResult<User> {
        DbReader::new(&self.conn).user(username)
    }

    fn list_users(&self) -> StoreResult<Vec<String>> {
        DbReader::new(&self.conn).usernames()
    }

    fn edit_user(&mut self, user: &User) -> StoreResult<User> {
        let tx = immediate(&mut self.conn)?;
        let updated = tx.execute(
            "UPDATE users SET email = ?2, full_name = ?3, hashed_password = ?4, disabled = ?5 \
             WHERE username = ?1",
            params![
                user.username,
                user.email,
                user.full_name,
                user.hashed_password,
                user.disabled
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::not_found(Entity::User, &user.username));
        }
        tx.commit()?;
        Ok(user.clone())
    }

    fn delete_user(&mut self, username: &str) -> StoreResult<User> {
        let tx = immediate(&mut self.conn)?;
        let user = DbReader::new(&tx).user(username)?;
        tx.execute("DELETE FROM users WHERE username = ?1", params![username])?;
        tx.commit()?;
        Ok(user)
    }
}
