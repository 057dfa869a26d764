//! The remote HTTP store wired to an in-process server.
//!
//! Runs the same conformance scenarios as the local backends, so the wire
//! protocol is checked from both ends at once.

use std::sync::Arc;

use mlte_core::{Artifact, ArtifactType, Context, ModelCreate, NamespaceCreate};
use mlte_server::client::InProcessClient;
use mlte_server::router::build_router;
use mlte_server::state::AppState;
use mlte_store::conformance;
use mlte_store::{
    Entity, HttpClient, MemoryStore, RemoteHttpStore, Store, StoreError, StoreUri,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

fn served(backend: Arc<dyn Store>) -> RemoteHttpStore {
    let router = build_router(AppState::new(backend), "/api", CorsLayer::permissive());
    let client: Arc<dyn HttpClient> = Arc::new(InProcessClient::new(router).unwrap());
    RemoteHttpStore::with_client(StoreUri::parse("http://localhost:8080").unwrap(), client)
        .unwrap()
}

fn memory() -> Arc<dyn Store> {
    Arc::new(MemoryStore::new(StoreUri::parse("memory://").unwrap()))
}

#[test]
fn remote_store_conforms() {
    let remote = served(memory());
    conformance::run_all(&remote).unwrap();
}

#[test]
fn remote_transcript_matches_memory() {
    let remote = served(memory());
    let local = MemoryStore::new(StoreUri::parse("memory://").unwrap());
    assert_eq!(
        conformance::transcript(&remote).unwrap(),
        conformance::transcript(&local).unwrap()
    );
}

#[test]
fn remote_store_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let uri = format!("sqlite://{}", dir.path().join("mlte.db").display());
    let backend: Arc<dyn Store> = Arc::from(mlte_store::create_store(&uri).unwrap());
    let remote = served(backend);
    conformance::run_all(&remote).unwrap();
}

#[test]
fn missing_artifact_is_not_found_not_internal() {
    let remote = served(memory());
    let mut session = remote.session().unwrap();
    session.create_namespace(&NamespaceCreate::new("ns")).unwrap();
    session.create_model("ns", &ModelCreate::new("m")).unwrap();
    session
        .create_version("ns", "m", &mlte_core::VersionCreate::new("v"))
        .unwrap();
    let ctx = Context::new("ns", "m", "v").unwrap();

    match session.read_artifact(&ctx, "ghost", None).unwrap_err() {
        StoreError::NotFound { entity, identifier } => {
            assert_eq!(entity, Entity::Artifact);
            assert_eq!(identifier, "ns/m/v/ghost");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }

    let written = session
        .write_artifact(&ctx, &Artifact::new("a b", ArtifactType::Spec, json!({"x": 1})))
        .unwrap();
    assert_eq!(session.read_artifact(&ctx, "a b", None).unwrap(), written);
}

#[test]
fn remote_writes_are_visible_in_backend() {
    let backend = memory();
    let remote = served(Arc::clone(&backend));
    remote
        .session()
        .unwrap()
        .create_namespace(&NamespaceCreate::new("shared"))
        .unwrap();
    assert_eq!(
        backend.session().unwrap().list_namespaces().unwrap(),
        vec!["shared"]
    );
}
