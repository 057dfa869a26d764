//! The [`Store`] / [`StoreSession`] contract and its user-store companion.
//!
//! A store is built from a URI and hands out sessions. A session is a scoped
//! handle to one backend medium: it is released when dropped, so every exit
//! path (including `?` on an error) gives the underlying connection or handle
//! back. Sessions are not shared between threads; open one per unit of work.
//!
//! All backends (memory, local filesystem, relational, remote HTTP) implement
//! these traits with identical observable behavior. The traits are
//! synchronous: every call blocks until the medium answers.

use mlte_core::{
    Artifact, Context, Model, ModelCreate, Namespace, NamespaceCreate, Query, User, Version,
    VersionCreate,
};

use crate::error::StoreResult;
use crate::uri::StoreUri;

/// An artifact store bound to one backend medium.
pub trait Store: Send + Sync {
    /// The URI this store was built from.
    fn uri(&self) -> &StoreUri;

    /// Opens a session. The session is released when dropped.
    fn session(&self) -> StoreResult<Box<dyn StoreSession + '_>>;
}

/// Structural and artifact operations against one backend medium.
///
/// Failure semantics shared by every implementation:
/// - `create_*` fails with `AlreadyExists` if the identifier is taken at
///   that scope; `read_*` / `delete_*` fail with `NotFound` if absent.
/// - Every artifact operation fails with `NotFound` if the context's
///   namespace, model or version does not exist.
/// - `write_artifact` never fails with `AlreadyExists`: writing an existing
///   identifier appends version `max + 1`.
/// - Listings are sorted by identifier.
/// - `.`, `..` and other identifiers no create would accept are reported
///   as `NotFound` by reads and deletes.
///
/// The local filesystem backend stores an artifact under its identifier with
/// spaces replaced by `-`, so `"a b"` and `"a-b"` share a file there and the
/// second one written fails with `Internal`.
pub trait StoreSession {
    // -------------------------------------------------------------------
    // Structural elements
    // -------------------------------------------------------------------

    fn create_namespace(&mut self, namespace: &NamespaceCreate) -> StoreResult<Namespace>;

    fn read_namespace(&self, namespace_id: &str) -> StoreResult<Namespace>;

    fn list_namespaces(&self) -> StoreResult<Vec<String>>;

    /// Deletes a namespace with all its models, versions and artifacts.
    fn delete_namespace(&mut self, namespace_id: &str) -> StoreResult<Namespace>;

    fn create_model(&mut self, namespace_id: &str, model: &ModelCreate) -> StoreResult<Model>;

    fn read_model(&self, namespace_id: &str, model_id: &str) -> StoreResult<Model>;

    fn list_models(&self, namespace_id: &str) -> StoreResult<Vec<String>>;

    /// Deletes a model with all its versions and artifacts.
    fn delete_model(&mut self, namespace_id: &str, model_id: &str) -> StoreResult<Model>;

    fn create_version(
        &mut self,
        namespace_id: &str,
        model_id: &str,
        version: &VersionCreate,
    ) -> StoreResult<Version>;

    fn read_version(
        &self,
        namespace_id: &str,
        model_id: &str,
        version_id: &str,
    ) -> StoreResult<Version>;

    fn list_versions(&self, namespace_id: &str, model_id: &str) -> StoreResult<Vec<String>>;

    /// Deletes a version with all its artifacts.
    fn delete_version(
        &mut self,
        namespace_id: &str,
        model_id: &str,
        version_id: &str,
    ) -> StoreResult<Version>;

    // -------------------------------------------------------------------
    // Artifacts
    // -------------------------------------------------------------------

    /// Creates the artifact at version 0, or appends `max(versions) + 1`.
    ///
    /// Returns the artifact as stored, carrying its assigned version.
    fn write_artifact(&mut self, context: &Context, artifact: &Artifact) -> StoreResult<Artifact>;

    /// Reads one version of an artifact; the highest version when `version`
    /// is `None`.
    fn read_artifact(
        &self,
        context: &Context,
        artifact_id: &str,
        version: Option<u64>,
    ) -> StoreResult<Artifact>;

    /// Lists the latest version of each artifact, sorted by identifier,
    /// skipping `offset` and returning at most `limit`.
    fn read_artifacts(
        &self,
        context: &Context,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Artifact>>;

    /// Applies `query` to the latest version of each artifact.
    fn search_artifacts(&self, context: &Context, query: &Query) -> StoreResult<Vec<Artifact>>;

    /// Deletes every version of an artifact, returning the last one.
    fn delete_artifact(&mut self, context: &Context, artifact_id: &str) -> StoreResult<Artifact>;
}

/// A user store bound to one backend medium.
pub trait UserStore: Send + Sync {
    fn uri(&self) -> &StoreUri;

    fn session(&self) -> StoreResult<Box<dyn UserStoreSession + '_>>;
}

/// User CRUD. Usernames are unique.
pub trait UserStoreSession {
    fn create_user(&mut self, user: &User) -> StoreResult<User>;

    fn read_user(&self, username: &str) -> StoreResult<User>;

    /// Usernames, sorted.
    fn list_users(&self) -> StoreResult<Vec<String>>;

    /// Replaces every field but the username.
    fn edit_user(&mut self, user: &User) -> StoreResult<User>;

    fn delete_user(&mut self, username: &str) -> StoreResult<User>;
}
