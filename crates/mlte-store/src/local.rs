//! Local filesystem backend.
//!
//! Layout under the root directory given by `local://<root>`:
//!
//! ```text
//! <root>/<namespace>/<model>/<version>/<artifact>.json
//! ```
//!
//! Each artifact file holds an [`ArtifactDocument`] with every version of
//! that artifact. Spaces in artifact identifiers become `-` in file names.
//! Document writes go through a temporary file in the same directory and a
//! rename, so readers never see a partial document. Two writers racing on the
//! same artifact can still lose one update.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use mlte_core::context::{model_key, version_key};
use mlte_core::{
    paginate, validate_identifier, Artifact, Context, Model, ModelCreate, Namespace,
    NamespaceCreate, Query, Version, VersionCreate,
};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::document::ArtifactDocument;
use crate::error::{Entity, StoreError, StoreResult};
use crate::traits::{Store, StoreSession};
use crate::uri::StoreUri;

const DOCUMENT_EXTENSION: &str = "json";

/// The file name holding all versions of `artifact_id`.
pub fn document_file_name(artifact_id: &str) -> String {
    format!("{}.{}", artifact_id.replace(' ', "-"), DOCUMENT_EXTENSION)
}

/// A store persisting JSON documents in a directory tree.
#[derive(Debug, Clone)]
pub struct LocalStore {
    uri: StoreUri,
    root: PathBuf,
    auto_create: bool,
}

impl LocalStore {
    /// Opens the store rooted at the path of a `local://` URI. The root
    /// directory must already exist.
    pub fn new(uri: StoreUri) -> StoreResult<Self> {
        let root = PathBuf::from(uri.remainder());
        if uri.remainder().is_empty() {
            return Err(StoreError::invalid_uri(uri.as_str(), "missing root path"));
        }
        if !root.is_dir() {
            return Err(StoreError::invalid_uri(
                uri.as_str(),
                format!("root directory {} does not exist", root.display()),
            ));
        }
        Ok(LocalStore {
            uri,
            root,
            auto_create: false,
        })
    }

    /// When enabled, writing an artifact creates missing model and version
    /// directories. The namespace must exist either way.
    pub fn with_auto_create(mut self, auto_create: bool) -> Self {
        self.auto_create = auto_create;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Store for LocalStore {
    fn uri(&self) -> &StoreUri {
        &self.uri
    }

    fn session(&self) -> StoreResult<Box<dyn StoreSession + '_>> {
        Ok(Box::new(LocalSession { store: self }))
    }
}

/// A session over a [`LocalStore`]. Holds no handles between calls.
pub struct LocalSession<'a> {
    store: &'a LocalStore,
}

/// Joins `identifier` onto `parent`, treating identifiers that could never
/// have been created (e.g. `..`) as absent.
fn child(parent: &Path, kind: &'static str, identifier: &str) -> Option<PathBuf> {
    validate_identifier(kind, identifier).ok()?;
    Some(parent.join(identifier))
}

fn existing_dir(path: Option<PathBuf>, entity: Entity, key: String) -> StoreResult<PathBuf> {
    match path {
        Some(path) if path.is_dir() => Ok(path),
        _ => Err(StoreError::not_found(entity, key)),
    }
}

/// Sorted names of the subdirectories of `dir`.
fn list_dirs(dir: &Path) -> StoreResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => warn!(?name, "skipping non UTF-8 directory name"),
        }
    }
    names.sort();
    Ok(names)
}

fn missing_artifact(context: &Context, artifact_id: &str) -> StoreError {
    StoreError::not_found(Entity::Artifact, context.artifact_key(artifact_id))
}

fn load_document(path: &Path) -> StoreResult<Option<ArtifactDocument>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let document = serde_json::from_str(&text).map_err(|e| {
        StoreError::internal(format!("corrupt document {}: {}", path.display(), e))
    })?;
    Ok(Some(document))
}

fn save_document(dir: &Path, path: &Path, document: &ArtifactDocument) -> StoreResult<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, document)?;
    tmp.write_all(b"\n")?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl LocalSession<'_> {
    fn namespace_dir(&self, namespace_id: &str) -> StoreResult<PathBuf> {
        existing_dir(
            child(&self.store.root, "namespace", namespace_id),
            Entity::Namespace,
            namespace_id.to_string(),
        )
    }

    fn model_dir(&self, namespace_id: &str, model_id: &str) -> StoreResult<PathBuf> {
        let ns = self.namespace_dir(namespace_id)?;
        existing_dir(
            child(&ns, "model", model_id),
            Entity::Model,
            model_key(namespace_id, model_id),
        )
    }

    fn version_dir(
        &self,
        namespace_id: &str,
        model_id: &str,
        version_id: &str,
    ) -> StoreResult<PathBuf> {
        let model = self.model_dir(namespace_id, model_id)?;
        existing_dir(
            child(&model, "version", version_id),
            Entity::Version,
            version_key(namespace_id, model_id, version_id),
        )
    }

    fn context_dir(&self, context: &Context) -> StoreResult<PathBuf> {
        self.version_dir(context.namespace(), context.model(), context.version())
    }

    /// Like [`Self::context_dir`], but creates missing model and version
    /// directories when the store allows it.
    fn writable_context_dir(&self, context: &Context) -> StoreResult<PathBuf> {
        if !self.store.auto_create {
            return self.context_dir(context);
        }
        let ns = self.namespace_dir(context.namespace())?;
        let dir = ns.join(context.model()).join(context.version());
        if !dir.is_dir() {
            fs::create_dir_all(&dir)?;
            debug!(context = %context, "auto-created version directory");
        }
        Ok(dir)
    }

    /// Loads the document of `artifact_id`, ignoring a file that belongs to
    /// a different identifier with the same file name.
    fn document(&self, dir: &Path, artifact_id: &str) -> StoreResult<Option<ArtifactDocument>> {
        let path = dir.join(document_file_name(artifact_id));
        Ok(load_document(&path)?.filter(|doc| doc.identifier == artifact_id))
    }

    fn latest_artifacts(&self, dir: &Path) -> StoreResult<Vec<Artifact>> {
        let mut artifacts = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            if let Some(latest) = load_document(&path)?.and_then(|doc| doc.latest()) {
                artifacts.push(latest);
            }
        }
        artifacts.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Ok(artifacts)
    }
}

impl StoreSession for LocalSession<'_> {
    fn create_namespace(&mut self, namespace: &NamespaceCreate) -> StoreResult<Namespace> {
        namespace.validate()?;
        let path = self.store.root.join(&namespace.identifier);
        if path.exists() {
            return Err(StoreError::already_exists(
                Entity::Namespace,
                &namespace.identifier,
            ));
        }
        fs::create_dir(&path)?;
        debug!(namespace = %namespace.identifier, path = %path.display(), "created namespace");
        Ok(Namespace {
            identifier: namespace.identifier.clone(),
            models: Vec::new(),
        })
    }

    fn read_namespace(&self, namespace_id: &str) -> StoreResult<Namespace> {
        let dir = self.namespace_dir(namespace_id)?;
        Ok(Namespace {
            identifier: namespace_id.to_string(),
            models: list_dirs(&dir)?,
        })
    }

    fn list_namespaces(&self) -> StoreResult<Vec<String>> {
        list_dirs(&self.store.root)
    }

    fn delete_namespace(&mut self, namespace_id: &str) -> StoreResult<Namespace> {
        let namespace = self.read_namespace(namespace_id)?;
        fs::remove_dir_all(self.store.root.join(namespace_id))?;
        debug!(namespace = %namespace_id, "deleted namespace");
        Ok(namespace)
    }

    fn create_model(&mut self, namespace_id: &str, model: &ModelCreate) -> StoreResult<Model> {
        model.validate()?;
        let path = self.namespace_dir(namespace_id)?.join(&model.identifier);
        if path.exists() {
            return Err(StoreError::already_exists(
                Entity::Model,
                model_key(namespace_id, &model.identifier),
            ));
        }
        fs::create_dir(&path)?;
        Ok(Model {
            identifier: model.identifier.clone(),
            versions: Vec::new(),
        })
    }

    fn read_model(&self, namespace_id: &str, model_id: &str) -> StoreResult<Model> {
        let dir = self.model_dir(namespace_id, model_id)?;
        Ok(Model {
            identifier: model_id.to_string(),
            versions: list_dirs(&dir)?,
        })
    }

    fn list_models(&self, namespace_id: &str) -> StoreResult<Vec<String>> {
        list_dirs(&self.namespace_dir(namespace_id)?)
    }

    fn delete_model(&mut self, namespace_id: &str, model_id: &str) -> StoreResult<Model> {
        let dir = self.model_dir(namespace_id, model_id)?;
        let model = Model {
            identifier: model_id.to_string(),
            versions: list_dirs(&dir)?,
        };
        fs::remove_dir_all(&dir)?;
        Ok(model)
    }

    fn create_version(
        &mut self,
        namespace_id: &str,
        model_id: &str,
        version: &VersionCreate,
    ) -> StoreResult<Version> {
        version.validate()?;
        let path = self
            .model_dir(namespace_id, model_id)?
            .join(&version.identifier);
        if path.exists() {
            return Err(StoreError::already_exists(
                Entity::Version,
                version_key(namespace_id, model_id, &version.identifier),
            ));
        }
        fs::create_dir(&path)?;
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
        self.version_dir(namespace_id, model_id, version_id)?;
        Ok(Version {
            identifier: version_id.to_string(),
        })
    }

    fn list_versions(&self, namespace_id: &str, model_id: &str) -> StoreResult<Vec<String>> {
        list_dirs(&self.model_dir(namespace_id, model_id)?)
    }

    fn delete_version(
        &mut self,
        namespace_id: &str,
        model_id: &str,
        version_id: &str,
    ) -> StoreResult<Version> {
        let dir = self.version_dir(namespace_id, model_id, version_id)?;
        fs::remove_dir_all(&dir)?;
        Ok(Version {
            identifier: version_id.to_string(),
        })
    }

    fn write_artifact(&mut self, context: &Context, artifact: &Artifact) -> StoreResult<Artifact> {
        artifact.validate()?;
        let dir = self.writable_context_dir(context)?;
        let path = dir.join(document_file_name(&artifact.identifier));

        let (document, assigned) = match load_document(&path)? {
            Some(doc) if doc.identifier != artifact.identifier => {
                return Err(StoreError::internal(format!(
                    "artifact '{}' maps to {} which already holds '{}'",
                    artifact.identifier,
                    path.display(),
                    doc.identifier
                )));
            }
            Some(mut doc) => {
                let assigned = doc.append(artifact);
                (doc, assigned)
            }
            None => (ArtifactDocument::create(artifact), 0),
        };
        save_document(&dir, &path, &document)?;
        debug!(
            context = %context,
            artifact = %artifact.identifier,
            version = assigned,
            "wrote artifact document"
        );
        Ok(artifact.clone().with_version(assigned))
    }

    fn read_artifact(
        &self,
        context: &Context,
        artifact_id: &str,
        version: Option<u64>,
    ) -> StoreResult<Artifact> {
        let dir = self.context_dir(context)?;
        self.document(&dir, artifact_id)?
            .and_then(|doc| doc.get(version))
            .ok_or_else(|| missing_artifact(context, artifact_id))
    }

    fn read_artifacts(
        &self,
        context: &Context,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Artifact>> {
        let dir = self.context_dir(context)?;
        Ok(paginate(self.latest_artifacts(&dir)?, limit, offset))
    }

    fn search_artifacts(&self, context: &Context, query: &Query) -> StoreResult<Vec<Artifact>> {
        let dir = self.context_dir(context)?;
        Ok(query.apply(self.latest_artifacts(&dir)?))
    }

    fn delete_artifact(&mut self, context: &Context, artifact_id: &str) -> StoreResult<Artifact> {
        let dir = self.context_dir(context)?;
        let latest = self
            .document(&dir, artifact_id)?
            .and_then(|doc| doc.latest())
            .ok_or_else(|| missing_artifact(context, artifact_id))?;
        fs::remove_file(dir.join(document_file_name(artifact_id)))?;
        Ok(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlte_core::ArtifactType;
    use serde_json::json;

    fn make_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let uri = StoreUri::parse(&format!("local://{}", dir.path().display())).unwrap();
        let store = LocalStore::new(uri).unwrap();
        (dir, store)
    }

    fn seed(session: &mut dyn StoreSession) -> Context {
        session.create_namespace(&NamespaceCreate::new("ns")).unwrap();
        session.create_model("ns", &ModelCreate::new("m")).unwrap();
        session.create_version("ns", "m", &VersionCreate::new("v")).unwrap();
        Context::new("ns", "m", "v").unwrap()
    }

    #[test]
    fn missing_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let uri = StoreUri::parse(&format!("local://{}", missing.display())).unwrap();
        let err = LocalStore::new(uri).unwrap_err();
        assert!(matches!(err, StoreError::InvalidUri { .. }));
    }

    #[test]
    fn artifact_file_layout() {
        let (dir, store) = make_store();
        let mut session = store.session().unwrap();
        let ctx = seed(session.as_mut());

        let artifact = Artifact::new("my result", ArtifactType::Value, json!({"x": 1}));
        session.write_artifact(&ctx, &artifact).unwrap();
        session.write_artifact(&ctx, &artifact).unwrap();

        let path = dir.path().join("ns/m/v/my-result.json");
        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(on_disk["identifier"], "my result");
        assert_eq!(on_disk["tag"], "value");
        assert_eq!(on_disk["versions"][1]["version"], 1);
        assert_eq!(on_disk["versions"][1]["data"], json!({"x": 1}));
    }

    #[test]
    fn no_temporary_files_left_behind() {
        let (dir, store) = make_store();
        let mut session = store.session().unwrap();
        let ctx = seed(session.as_mut());
        for i in 0..3 {
            let artifact = Artifact::new("a", ArtifactType::Value, json!(i));
            session.write_artifact(&ctx, &artifact).unwrap();
        }
        let entries: Vec<_> = fs::read_dir(dir.path().join("ns/m/v")).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn write_without_version_dir_fails_by_default() {
        let (_dir, store) = make_store();
        let mut session = store.session().unwrap();
        session.create_namespace(&NamespaceCreate::new("ns")).unwrap();

        let ctx = Context::new("ns", "m", "v").unwrap();
        let artifact = Artifact::new("a", ArtifactType::Value, json!(1));
        let err = session.write_artifact(&ctx, &artifact).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: Entity::Model, .. }));
    }

    #[test]
    fn auto_create_makes_model_and_version() {
        let (dir, store) = make_store();
        let store = store.with_auto_create(true);
        let mut session = store.session().unwrap();
        session.create_namespace(&NamespaceCreate::new("ns")).unwrap();

        let ctx = Context::new("ns", "m", "v").unwrap();
        let artifact = Artifact::new("a", ArtifactType::Value, json!(1));
        assert_eq!(session.write_artifact(&ctx, &artifact).unwrap().version, 0);
        assert!(dir.path().join("ns/m/v/a.json").is_file());

        // The namespace is never created implicitly.
        let ctx = Context::new("other", "m", "v").unwrap();
        assert!(session.write_artifact(&ctx, &artifact).unwrap_err().is_not_found());
    }

    #[test]
    fn colliding_file_names_do_not_mix_documents() {
        let (_dir, store) = make_store();
        let mut session = store.session().unwrap();
        let ctx = seed(session.as_mut());

        let spaced = Artifact::new("a b", ArtifactType::Value, json!(1));
        session.write_artifact(&ctx, &spaced).unwrap();

        let dashed = Artifact::new("a-b", ArtifactType::Value, json!(2));
        assert!(session.write_artifact(&ctx, &dashed).unwrap_err().is_internal());
        assert!(session.read_artifact(&ctx, "a-b", None).unwrap_err().is_not_found());
        assert_eq!(session.read_artifact(&ctx, "a b", None).unwrap().body, json!(1));
    }

    #[test]
    fn corrupt_document_is_internal() {
        let (dir, store) = make_store();
        let mut session = store.session().unwrap();
        let ctx = seed(session.as_mut());
        fs::write(dir.path().join("ns/m/v/a.json"), "{not json").unwrap();

        assert!(session.read_artifact(&ctx, "a", None).unwrap_err().is_internal());
        assert!(session.read_artifacts(&ctx, 10, 0).unwrap_err().is_internal());
    }

    #[test]
    fn traversal_identifiers_are_not_found() {
        let (_dir, store) = make_store();
        let session = store.session().unwrap();
        assert!(session.read_namespace("..").unwrap_err().is_not_found());
        assert!(session.list_models("../..").unwrap_err().is_not_found());
    }
}
