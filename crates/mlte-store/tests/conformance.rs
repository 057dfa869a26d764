//! Cross-backend conformance: every local backend runs the same scenarios
//! and must produce the same observable results.

use mlte_core::ArtifactType;
use mlte_store::conformance;
use mlte_store::{create_store, Store};
use proptest::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

/// A store plus whatever temporary directory keeps it alive.
struct Backend {
    name: &'static str,
    store: Box<dyn Store>,
    _dir: Option<TempDir>,
}

fn memory() -> Backend {
    Backend {
        name: "memory",
        store: create_store("memory://").unwrap(),
        _dir: None,
    }
}

fn local() -> Backend {
    let dir = tempfile::tempdir().unwrap();
    let store = create_store(&format!("local://{}", dir.path().display())).unwrap();
    Backend {
        name: "local",
        store,
        _dir: Some(dir),
    }
}

fn sqlite() -> Backend {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("mlte.db");
    let store = create_store(&format!("sqlite://{}", db.display())).unwrap();
    Backend {
        name: "sqlite",
        store,
        _dir: Some(dir),
    }
}

fn backends() -> Vec<Backend> {
    vec![memory(), local(), sqlite()]
}

#[test]
fn every_backend_passes_every_scenario() {
    for backend in backends() {
        if let Err(failure) = conformance::run_all(backend.store.as_ref()) {
            panic!("{} backend: {}", backend.name, failure);
        }
    }
}

#[test]
fn backends_produce_identical_transcripts() {
    let reference = conformance::transcript(memory().store.as_ref()).unwrap();
    assert!(reference.iter().any(|line| line.starts_with("create ns again: already exists")));

    for backend in [local(), sqlite()] {
        let transcript = conformance::transcript(backend.store.as_ref()).unwrap();
        assert_eq!(transcript, reference, "{} backend diverges", backend.name);
    }
}

#[test]
fn sessions_are_independent_handles() {
    for backend in backends() {
        let store = backend.store.as_ref();
        let mut writer = store.session().unwrap();
        let reader = store.session().unwrap();
        writer
            .create_namespace(&mlte_core::NamespaceCreate::new("shared"))
            .unwrap();
        assert_eq!(
            reader.list_namespaces().unwrap(),
            vec!["shared"],
            "{}",
            backend.name
        );
    }
}

fn json_body() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| json!(m)),
        ]
    })
}

fn artifact_type() -> impl Strategy<Value = ArtifactType> {
    prop::sample::select(ArtifactType::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn versions_are_dense_and_ordered(writes in 0u64..8) {
        for backend in backends() {
            let outcome = conformance::version_monotonicity(backend.store.as_ref(), writes);
            prop_assert!(outcome.is_ok(), "{}: {:?}", backend.name, outcome);
        }
    }

    #[test]
    fn payloads_round_trip(kind in artifact_type(), body in json_body()) {
        for backend in backends() {
            let outcome = conformance::round_trip(backend.store.as_ref(), kind, body.clone());
            prop_assert!(outcome.is_ok(), "{}: {:?}", backend.name, outcome);
        }
    }
}
