//! In-memory backend.
//!
//! The whole hierarchy lives behind one `RwLock` shared by every session of
//! a store. Ordered maps give sorted listings for free. Nothing is persisted.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use mlte_core::context::{model_key, version_key};
use mlte_core::{
    paginate, Artifact, Context, Model, ModelCreate, Namespace, NamespaceCreate, Query, User,
    Version, VersionCreate,
};
use tracing::debug;

use crate::document::ArtifactDocument;
use crate::error::{Entity, StoreError, StoreResult};
use crate::traits::{Store, StoreSession, UserStore, UserStoreSession};
use crate::uri::StoreUri;

#[derive(Debug, Default)]
struct Hierarchy {
    namespaces: BTreeMap<String, NamespaceNode>,
}

#[derive(Debug, Default)]
struct NamespaceNode {
    models: BTreeMap<String, ModelNode>,
}

#[derive(Debug, Default)]
struct ModelNode {
    versions: BTreeMap<String, VersionNode>,
}

#[derive(Debug, Default)]
struct VersionNode {
    artifacts: BTreeMap<String, ArtifactDocument>,
}

impl Hierarchy {
    fn namespace(&self, ns: &str) -> StoreResult<&NamespaceNode> {
        self.namespaces
            .get(ns)
            .ok_or_else(|| StoreError::not_found(Entity::Namespace, ns))
    }

    fn namespace_mut(&mut self, ns: &str) -> StoreResult<&mut NamespaceNode> {
        self.namespaces
            .get_mut(ns)
            .ok_or_else(|| StoreError::not_found(Entity::Namespace, ns))
    }

    fn model(&self, ns: &str, model: &str) -> StoreResult<&ModelNode> {
        self.namespace(ns)?
            .models
            .get(model)
            .ok_or_else(|| StoreError::not_found(Entity::Model, model_key(ns, model)))
    }

    fn model_mut(&mut self, ns: &str, model: &str) -> StoreResult<&mut ModelNode> {
        self.namespace_mut(ns)?
            .models
            .get_mut(model)
            .ok_or_else(|| StoreError::not_found(Entity::Model, model_key(ns, model)))
    }

    fn version(&self, context: &Context) -> StoreResult<&VersionNode> {
        self.model(context.namespace(), context.model())?
            .versions
            .get(context.version())
            .ok_or_else(|| StoreError::not_found(Entity::Version, context.key()))
    }

    fn version_mut(&mut self, context: &Context) -> StoreResult<&mut VersionNode> {
        self.model_mut(context.namespace(), context.model())?
            .versions
            .get_mut(context.version())
            .ok_or_else(|| StoreError::not_found(Entity::Version, context.key()))
    }
}

impl NamespaceNode {
    fn describe(&self, identifier: &str) -> Namespace {
        Namespace {
            identifier: identifier.to_string(),
            models: self.models.keys().cloned().collect(),
        }
    }
}

impl ModelNode {
    fn describe(&self, identifier: &str) -> Model {
        Model {
            identifier: identifier.to_string(),
            versions: self.versions.keys().cloned().collect(),
        }
    }
}

impl VersionNode {
    fn latest_artifacts(&self) -> impl Iterator<Item = Artifact> + '_ {
        self.artifacts.values().filter_map(ArtifactDocument::latest)
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::internal("in-memory store lock poisoned")
}

// ---------------------------------------------------------------------------
// Artifact store
// ---------------------------------------------------------------------------

/// An artifact store held entirely in process memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    uri: StoreUri,
    state: Arc<RwLock<Hierarchy>>,
}

impl MemoryStore {
    pub fn new(uri: StoreUri) -> Self {
        MemoryStore {
            uri,
            state: Arc::default(),
        }
    }
}

impl Store for MemoryStore {
    fn uri(&self) -> &StoreUri {
        &self.uri
    }

    fn session(&self) -> StoreResult<Box<dyn StoreSession + '_>> {
        Ok(Box::new(MemorySession { state: &self.state }))
    }
}

/// A session over a [`MemoryStore`]. Each call takes the lock for its own
/// duration only.
pub struct MemorySession<'a> {
    state: &'a RwLock<Hierarchy>,
}

impl MemorySession<'_> {
    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Hierarchy>> {
        self.state.read().map_err(poisoned)
    }

    fn write(&mut self) -> StoreResult<RwLockWriteGuard<'_, Hierarchy>> {
        self.state.write().map_err(poisoned)
    }
}

impl StoreSession for MemorySession<'_> {
    fn create_namespace(&mut self, namespace: &NamespaceCreate) -> StoreResult<Namespace> {
        namespace.validate()?;
        let mut state = self.write()?;
        if state.namespaces.contains_key(&namespace.identifier) {
            return Err(StoreError::already_exists(
                Entity::Namespace,
                &namespace.identifier,
            ));
        }
        let node = state
            .namespaces
            .entry(namespace.identifier.clone())
            .or_default();
        debug!(namespace = %namespace.identifier, "created namespace");
        Ok(node.describe(&namespace.identifier))
    }

    fn read_namespace(&self, namespace_id: &str) -> StoreResult<Namespace> {
        let state = self.read()?;
        Ok(state.namespace(namespace_id)?.describe(namespace_id))
    }

    fn list_namespaces(&self) -> StoreResult<Vec<String>> {
        Ok(self.read()?.namespaces.keys().cloned().collect())
    }

    fn delete_namespace(&mut self, namespace_id: &str) -> StoreResult<Namespace> {
        let mut state = self.write()?;
        let node = state
            .namespaces
            .remove(namespace_id)
            .ok_or_else(|| StoreError::not_found(Entity::Namespace, namespace_id))?;
        Ok(node.describe(namespace_id))
    }

    fn create_model(&mut self, namespace_id: &str, model: &ModelCreate) -> StoreResult<Model> {
        model.validate()?;
        let mut state = self.write()?;
        let ns = state.namespace_mut(namespace_id)?;
        if ns.models.contains_key(&model.identifier) {
            return Err(StoreError::already_exists(
                Entity::Model,
                model_key(namespace_id, &model.identifier),
            ));
        }
        let node = ns.models.entry(model.identifier.clone()).or_default();
        Ok(node.describe(&model.identifier))
    }

    fn read_model(&self, namespace_id: &str, model_id: &str) -> StoreResult<Model> {
        let state = self.read()?;
        Ok(state.model(namespace_id, model_id)?.describe(model_id))
    }

    fn list_models(&self, namespace_id: &str) -> StoreResult<Vec<String>> {
        let state = self.read()?;
        Ok(state.namespace(namespace_id)?.models.keys().cloned().collect())
    }

    fn delete_model(&mut self, namespace_id: &str, model_id: &str) -> StoreResult<Model> {
        let mut state = self.write()?;
        let node = state
            .namespace_mut(namespace_id)?
            .models
            .remove(model_id)
            .ok_or_else(|| {
                StoreError::not_found(Entity::Model, model_key(namespace_id, model_id))
            })?;
        Ok(node.describe(model_id))
    }

    fn create_version(
        &mut self,
        namespace_id: &str,
        model_id: &str,
        version: &VersionCreate,
    ) -> StoreResult<Version> {
        version.validate()?;
        let mut state = self.write()?;
        let model = state.model_mut(namespace_id, model_id)?;
        if model.versions.contains_key(&version.identifier) {
            return Err(StoreError::already_exists(
                Entity::Version,
                version_key(namespace_id, model_id, &version.identifier),
            ));
        }
        model
            .versions
            .insert(version.identifier.clone(), VersionNode::default());
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
        let state = self.read()?;
        if !state.model(namespace_id, model_id)?.versions.contains_key(version_id) {
            return Err(StoreError::not_found(
                Entity::Version,
                version_key(namespace_id, model_id, version_id),
            ));
        }
        Ok(Version {
            identifier: version_id.to_string(),
        })
    }

    fn list_versions(&self, namespace_id: &str, model_id: &str) -> StoreResult<Vec<String>> {
        let state = self.read()?;
        Ok(state
            .model(namespace_id, model_id)?
            .versions
            .keys()
            .cloned()
            .collect())
    }

    fn delete_version(
        &mut self,
        namespace_id: &str,
        model_id: &str,
        version_id: &str,
    ) -> StoreResult<Version> {
        let mut state = self.write()?;
        state
            .model_mut(namespace_id, model_id)?
            .versions
            .remove(version_id)
            .ok_or_else(|| {
                StoreError::not_found(
                    Entity::Version,
                    version_key(namespace_id, model_id, version_id),
                )
            })?;
        Ok(Version {
            identifier: version_id.to_string(),
        })
    }

    fn write_artifact(&mut self, context: &Context, artifact: &Artifact) -> StoreResult<Artifact> {
        artifact.validate()?;
        let mut state = self.write()?;
        let version = state.version_mut(context)?;
        let assigned = match version.artifacts.get_mut(&artifact.identifier) {
            Some(doc) => doc.append(artifact),
            None => {
                version.artifacts.insert(
                    artifact.identifier.clone(),
                    ArtifactDocument::create(artifact),
                );
                0
            }
        };
        debug!(
            context = %context,
            artifact = %artifact.identifier,
            version = assigned,
            "wrote artifact"
        );
        Ok(artifact.clone().with_version(assigned))
    }

    fn read_artifact(
        &self,
        context: &Context,
        artifact_id: &str,
        version: Option<u64>,
    ) -> StoreResult<Artifact> {
        let state = self.read()?;
        state
            .version(context)?
            .artifacts
            .get(artifact_id)
            .and_then(|doc| doc.get(version))
            .ok_or_else(|| {
                StoreError::not_found(Entity::Artifact, context.artifact_key(artifact_id))
            })
    }

    fn read_artifacts(
        &self,
        context: &Context,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Artifact>> {
        let state = self.read()?;
        Ok(paginate(state.version(context)?.latest_artifacts(), limit, offset))
    }

    fn search_artifacts(&self, context: &Context, query: &Query) -> StoreResult<Vec<Artifact>> {
        let state = self.read()?;
        Ok(query.apply(state.version(context)?.latest_artifacts()))
    }

    fn delete_artifact(&mut self, context: &Context, artifact_id: &str) -> StoreResult<Artifact> {
        let mut state = self.write()?;
        state
            .version_mut(context)?
            .artifacts
            .remove(artifact_id)
            .and_then(|doc| doc.latest())
            .ok_or_else(|| {
                StoreError::not_found(Entity::Artifact, context.artifact_key(artifact_id))
            })
    }
}

// ---------------------------------------------------------------------------
// User store
// ---------------------------------------------------------------------------

/// A user store held in process memory.
#[derive(Debug, Clone)]
pub struct MemoryUserStore {
    uri: StoreUri,
    users: Arc<RwLock<BTreeMap<String, User>>>,
}

impl MemoryUserStore {
    pub fn new(uri: StoreUri) -> Self {
        MemoryUserStore {
            uri,
            users: Arc::default(),
        }
    }
}

impl UserStore for MemoryUserStore {
    fn uri(&self) -> &StoreUri {
        &self.uri
    }

    fn session(&self) -> StoreResult<Box<dyn UserStoreSession + '_>> {
        Ok(Box::new(MemoryUserSession { users: &self.users }))
    }
}

pub struct MemoryUserSession<'a> {
    users: &'a RwLock<BTreeMap<String, User>>,
}

impl UserStoreSession for MemoryUserSession<'_> {
    fn create_user(&mut self, user: &User) -> StoreResult<User> {
        user.validate()?;
        let mut users = self.users.write().map_err(poisoned)?;
        if users.contains_key(&user.username) {
            return Err(StoreError::already_exists(Entity::User, &user.username));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user.clone())
    }

    fn read_user(&self, username: &str) -> StoreResult<User> {
        let users = self.users.read().map_err(poisoned)?;
        users
            .get(username)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::User, username))
    }

    fn list_users(&self) -> StoreResult<Vec<String>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.keys().cloned().collect())
    }

    fn edit_user(&mut self, user: &User) -> StoreResult<User> {
        let mut users = self.users.write().map_err(poisoned)?;
        let stored = users
            .get_mut(&user.username)
            .ok_or_else(|| StoreError::not_found(Entity::User, &user.username))?;
        *stored = user.clone();
        Ok(user.clone())
    }

    fn delete_user(&mut self, username: &str) -> StoreResult<User> {
        let mut users = self.users.write().map_err(poisoned)?;
        users
            .remove(username)
            .ok_or_else(|| StoreError::not_found(Entity::User, username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlte_core::ArtifactType;
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::new(StoreUri::parse("memory://").unwrap())
    }

    #[test]
    fn sessions_share_state() {
        let store = store();
        {
            let mut session = store.session().unwrap();
            session.create_namespace(&NamespaceCreate::new("ns0")).unwrap();
        }
        let session = store.session().unwrap();
        assert_eq!(session.list_namespaces().unwrap(), vec!["ns0"]);
    }

    #[test]
    fn clones_share_state() {
        let store = store();
        let other = store.clone();
        store
            .session()
            .unwrap()
            .create_namespace(&NamespaceCreate::new("ns0"))
            .unwrap();
        assert!(other.session().unwrap().read_namespace("ns0").is_ok());
    }

    #[test]
    fn deleted_artifact_is_reported_at_latest_version() {
        let store = store();
        let mut session = store.session().unwrap();
        session.create_namespace(&NamespaceCreate::new("ns")).unwrap();
        session.create_model("ns", &ModelCreate::new("m")).unwrap();
        session.create_version("ns", "m", &VersionCreate::new("v")).unwrap();
        let ctx = Context::new("ns", "m", "v").unwrap();

        let artifact = Artifact::new("a", ArtifactType::Value, json!(1));
        session.write_artifact(&ctx, &artifact).unwrap();
        session.write_artifact(&ctx, &artifact).unwrap();

        let deleted = session.delete_artifact(&ctx, "a").unwrap();
        assert_eq!(deleted.version, 1);
        assert!(session.read_artifact(&ctx, "a", None).unwrap_err().is_not_found());
    }

    #[test]
    fn user_crud() {
        let store = MemoryUserStore::new(StoreUri::parse("memory://").unwrap());
        let mut session = store.session().unwrap();

        session.create_user(&User::new("zoe", "h1")).unwrap();
        session.create_user(&User::new("al", "h2")).unwrap();
        assert!(session
            .create_user(&User::new("al", "h3"))
            .unwrap_err()
            .is_already_exists());
        assert_eq!(session.list_users().unwrap(), vec!["al", "zoe"]);

        let mut edited = User::new("al", "h4");
        edited.disabled = true;
        session.edit_user(&edited).unwrap();
        assert!(session.read_user("al").unwrap().disabled);

        assert!(session.edit_user(&User::new("bob", "h")).unwrap_err().is_not_found());
        assert_eq!(session.delete_user("zoe").unwrap().hashed_password, "h1");
        assert!(session.read_user("zoe").unwrap_err().is_not_found());
    }
}
