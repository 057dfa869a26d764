//! Backend-agnostic behavior checks for [`Store`] implementations.
//!
//! Each scenario drives a store through the public session API and reports
//! the first deviation as a [`ConformanceFailure`] instead of panicking, so
//! the same scenarios can run from unit tests, integration tests and
//! property tests of any backend. Scenarios work in their own namespaces and
//! can share one store.

use std::fmt::Debug;

use mlte_core::{
    Artifact, ArtifactType, Condition, Context, Filter, ModelCreate, NamespaceCreate, Query,
    VersionCreate,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::error::{Entity, StoreError, StoreResult};
use crate::traits::{Store, StoreSession};

#[derive(Debug, Error)]
pub enum ConformanceFailure {
    #[error("unexpected store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Mismatch(String),
}

pub type Outcome = Result<(), ConformanceFailure>;

fn ensure_eq<T: PartialEq + Debug>(actual: T, expected: T, what: &str) -> Outcome {
    if actual == expected {
        Ok(())
    } else {
        Err(ConformanceFailure::Mismatch(format!(
            "{}: expected {:?}, got {:?}",
            what, expected, actual
        )))
    }
}

fn expect_not_found<T: Debug>(result: StoreResult<T>, entity: Entity, what: &str) -> Outcome {
    match result {
        Err(StoreError::NotFound { entity: found, .. }) if found == entity => Ok(()),
        other => Err(ConformanceFailure::Mismatch(format!(
            "{}: expected {} not found, got {:?}",
            what, entity, other
        ))),
    }
}

fn expect_already_exists<T: Debug>(result: StoreResult<T>, entity: Entity, what: &str) -> Outcome {
    match result {
        Err(StoreError::AlreadyExists { entity: found, .. }) if found == entity => Ok(()),
        other => Err(ConformanceFailure::Mismatch(format!(
            "{}: expected {} already exists, got {:?}",
            what, entity, other
        ))),
    }
}

/// Creates whatever part of the context hierarchy is missing.
pub fn ensure_context(session: &mut dyn StoreSession, context: &Context) -> StoreResult<()> {
    let (ns, model, version) = (context.namespace(), context.model(), context.version());
    if !session.list_namespaces()?.iter().any(|n| n == ns) {
        session.create_namespace(&NamespaceCreate::new(ns))?;
    }
    if !session.list_models(ns)?.iter().any(|m| m == model) {
        session.create_model(ns, &ModelCreate::new(model))?;
    }
    if !session.list_versions(ns, model)?.iter().any(|v| v == version) {
        session.create_version(ns, model, &VersionCreate::new(version))?;
    }
    Ok(())
}

fn value(id: &str, body: Value) -> Artifact {
    Artifact::new(id, ArtifactType::Value, body)
}

/// Two writes, reads by version, then a version delete.
pub fn concrete_scenario(store: &dyn Store) -> Outcome {
    let mut session = store.session()?;
    session.create_namespace(&NamespaceCreate::new("ns0"))?;
    session.create_model("ns0", &ModelCreate::new("model0"))?;
    session.create_version("ns0", "model0", &VersionCreate::new("v0"))?;
    let ctx = Context::new("ns0", "model0", "v0").map_err(StoreError::from)?;

    let first = session.write_artifact(&ctx, &value("a", json!({"v": 1})))?;
    ensure_eq(first.version, 0, "first write version")?;
    let second = session.write_artifact(&ctx, &value("a", json!({"v": 2})))?;
    ensure_eq(second.version, 1, "second write version")?;

    ensure_eq(
        session.read_artifact(&ctx, "a", None)?.body,
        json!({"v": 2}),
        "latest body",
    )?;
    ensure_eq(
        session.read_artifact(&ctx, "a", Some(0))?.body,
        json!({"v": 1}),
        "version 0 body",
    )?;

    session.delete_version("ns0", "model0", "v0")?;
    expect_not_found(
        session.read_artifact(&ctx, "a", None),
        Entity::Version,
        "read after version delete",
    )
}

/// Writing one identifier `writes` times yields versions `0..writes`.
pub fn version_monotonicity(store: &dyn Store, writes: u64) -> Outcome {
    let mut session = store.session()?;
    let ctx = Context::new("monotonic", "m", "v").map_err(StoreError::from)?;
    ensure_context(session.as_mut(), &ctx)?;
    match session.delete_artifact(&ctx, "counter") {
        Ok(_) => {}
        Err(err) if err.is_not_found() => {}
        Err(err) => return Err(err.into()),
    }

    for expected in 0..writes {
        let written = session.write_artifact(&ctx, &value("counter", json!(expected)))?;
        ensure_eq(written.version, expected, "assigned version")?;
    }
    if writes > 0 {
        let latest = session.read_artifact(&ctx, "counter", None)?;
        ensure_eq(latest.version, writes - 1, "latest version")?;
        ensure_eq(latest.body, json!(writes - 1), "latest body")?;
        for version in 0..writes {
            let stored = session.read_artifact(&ctx, "counter", Some(version))?;
            ensure_eq(stored.body, json!(version), "stored body")?;
        }
    }
    expect_not_found(
        session.read_artifact(&ctx, "counter", Some(writes)),
        Entity::Artifact,
        "read past latest version",
    )
}

/// What is written is what is read back.
pub fn round_trip(store: &dyn Store, kind: ArtifactType, body: Value) -> Outcome {
    let mut session = store.session()?;
    let ctx = Context::new("roundtrip", "m", "v").map_err(StoreError::from)?;
    ensure_context(session.as_mut(), &ctx)?;

    let written = session.write_artifact(&ctx, &Artifact::new("payload", kind, body.clone()))?;
    let read = session.read_artifact(&ctx, "payload", None)?;
    ensure_eq(&read, &written, "read back")?;
    ensure_eq(read.kind, kind, "type")?;
    ensure_eq(read.body, body, "body")
}

/// An artifact is only visible in the context it was written to.
pub fn hierarchy_isolation(store: &dyn Store) -> Outcome {
    let mut session = store.session()?;
    let a = Context::new("isolation", "m", "v1").map_err(StoreError::from)?;
    let b = Context::new("isolation", "m", "v2").map_err(StoreError::from)?;
    let c = Context::new("isolation-other", "m", "v1").map_err(StoreError::from)?;
    for ctx in [&a, &b, &c] {
        ensure_context(session.as_mut(), ctx)?;
    }

    session.write_artifact(&a, &value("x", json!("only in a")))?;
    expect_not_found(session.read_artifact(&b, "x", None), Entity::Artifact, "other version")?;
    expect_not_found(session.read_artifact(&c, "x", None), Entity::Artifact, "other namespace")?;
    ensure_eq(session.read_artifacts(&b, 10, 0)?.len(), 0, "listing of other version")?;
    expect_not_found(session.delete_artifact(&b, "x"), Entity::Artifact, "delete elsewhere")?;
    ensure_eq(
        session.read_artifact(&a, "x", None)?.body,
        json!("only in a"),
        "original still present",
    )
}

/// Creates at a taken identifier conflict; after deletion they succeed.
pub fn duplicate_create(store: &dyn Store) -> Outcome {
    let mut session = store.session()?;
    session.create_namespace(&NamespaceCreate::new("duplicate"))?;
    expect_already_exists(
        session.create_namespace(&NamespaceCreate::new("duplicate")),
        Entity::Namespace,
        "namespace",
    )?;

    session.create_model("duplicate", &ModelCreate::new("m"))?;
    expect_already_exists(
        session.create_model("duplicate", &ModelCreate::new("m")),
        Entity::Model,
        "model",
    )?;

    session.create_version("duplicate", "m", &VersionCreate::new("v"))?;
    expect_already_exists(
        session.create_version("duplicate", "m", &VersionCreate::new("v")),
        Entity::Version,
        "version",
    )?;

    // The same identifiers are free in a sibling scope.
    session.create_model("duplicate", &ModelCreate::new("m2"))?;
    session.create_version("duplicate", "m2", &VersionCreate::new("v"))?;

    session.delete_version("duplicate", "m", "v")?;
    session.create_version("duplicate", "m", &VersionCreate::new("v"))?;
    session.delete_model("duplicate", "m")?;
    session.create_model("duplicate", &ModelCreate::new("m"))?;
    session.delete_namespace("duplicate")?;
    session.create_namespace(&NamespaceCreate::new("duplicate"))?;
    ensure_eq(
        session.read_namespace("duplicate")?.models,
        Vec::<String>::new(),
        "recreated namespace is empty",
    )
}

/// Deleting a node removes everything below it and nothing beside it.
pub fn cascade_delete(store: &dyn Store) -> Outcome {
    let mut session = store.session()?;
    let doomed = Context::new("cascade", "doomed", "v1").map_err(StoreError::from)?;
    let doomed2 = Context::new("cascade", "doomed", "v2").map_err(StoreError::from)?;
    let kept = Context::new("cascade", "kept", "v1").map_err(StoreError::from)?;
    for ctx in [&doomed, &doomed2, &kept] {
        ensure_context(session.as_mut(), ctx)?;
        session.write_artifact(ctx, &value("x", json!(1)))?;
    }

    let deleted = session.delete_model("cascade", "doomed")?;
    ensure_eq(deleted.identifier.as_str(), "doomed", "deleted model")?;
    ensure_eq(deleted.versions, vec!["v1".to_string(), "v2".to_string()], "deleted versions")?;

    expect_not_found(session.read_model("cascade", "doomed"), Entity::Model, "model")?;
    expect_not_found(
        session.read_version("cascade", "doomed", "v1"),
        Entity::Model,
        "version under deleted model",
    )?;
    expect_not_found(
        session.read_artifact(&doomed2, "x", None),
        Entity::Model,
        "artifact under deleted model",
    )?;
    ensure_eq(session.list_models("cascade")?, vec!["kept".to_string()], "remaining models")?;
    ensure_eq(session.read_artifact(&kept, "x", None)?.version, 0, "sibling artifact")?;

    let deleted = session.delete_namespace("cascade")?;
    ensure_eq(deleted.models, vec!["kept".to_string()], "deleted namespace models")?;
    expect_not_found(session.read_namespace("cascade"), Entity::Namespace, "namespace")?;
    expect_not_found(
        session.read_artifact(&kept, "x", None),
        Entity::Namespace,
        "artifact under deleted namespace",
    )?;
    expect_not_found(session.delete_namespace("cascade"), Entity::Namespace, "second delete")
}

/// Operations against a missing hierarchy fail with the missing level.
pub fn missing_hierarchy(store: &dyn Store) -> Outcome {
    let mut session = store.session()?;
    session.create_namespace(&NamespaceCreate::new("missing"))?;
    session.create_model("missing", &ModelCreate::new("m"))?;

    expect_not_found(session.read_namespace("absent"), Entity::Namespace, "read namespace")?;
    expect_not_found(session.list_models("absent"), Entity::Namespace, "list models")?;
    expect_not_found(
        session.create_model("absent", &ModelCreate::new("m")),
        Entity::Namespace,
        "create model",
    )?;
    expect_not_found(session.list_versions("missing", "absent"), Entity::Model, "list versions")?;
    expect_not_found(
        session.create_version("missing", "absent", &VersionCreate::new("v")),
        Entity::Model,
        "create version",
    )?;
    expect_not_found(
        session.delete_version("missing", "m", "absent"),
        Entity::Version,
        "delete version",
    )?;

    let ctx = Context::new("missing", "m", "absent").map_err(StoreError::from)?;
    expect_not_found(
        session.write_artifact(&ctx, &value("a", json!(1))),
        Entity::Version,
        "write artifact",
    )?;
    expect_not_found(session.read_artifacts(&ctx, 10, 0), Entity::Version, "read artifacts")?;
    expect_not_found(
        session.search_artifacts(&ctx, &Query::default()),
        Entity::Version,
        "search artifacts",
    )?;

    session.create_version("missing", "m", &VersionCreate::new("v"))?;
    let ctx = Context::new("missing", "m", "v").map_err(StoreError::from)?;
    expect_not_found(session.read_artifact(&ctx, "a", None), Entity::Artifact, "read artifact")?;
    expect_not_found(session.delete_artifact(&ctx, "a"), Entity::Artifact, "delete artifact")
}

/// Listings are sorted and paginated by identifier.
pub fn listing_and_pagination(store: &dyn Store) -> Outcome {
    let mut session = store.session()?;
    session.create_namespace(&NamespaceCreate::new("listing"))?;
    for model in ["gamma", "alpha", "beta"] {
        session.create_model("listing", &ModelCreate::new(model))?;
    }
    ensure_eq(
        session.list_models("listing")?,
        vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()],
        "sorted models",
    )?;
    for version in ["v2", "v10", "v1"] {
        session.create_version("listing", "alpha", &VersionCreate::new(version))?;
    }
    ensure_eq(
        session.read_model("listing", "alpha")?.versions,
        vec!["v1".to_string(), "v10".to_string(), "v2".to_string()],
        "sorted versions",
    )?;

    let ctx = Context::new("listing", "alpha", "v1").map_err(StoreError::from)?;
    for id in ["e", "c", "a", "d", "b"] {
        session.write_artifact(&ctx, &value(id, json!(id)))?;
    }
    session.write_artifact(&ctx, &value("c", json!("c2")))?;

    let ids = |artifacts: Vec<Artifact>| -> Vec<String> {
        artifacts.into_iter().map(|a| a.identifier).collect()
    };
    let all = session.read_artifacts(&ctx, 100, 0)?;
    let expected: Vec<String> = ["a", "b", "c", "d", "e"].map(String::from).into();
    ensure_eq(ids(all.clone()), expected, "full listing")?;
    let c = all
        .iter()
        .find(|a| a.identifier == "c")
        .ok_or_else(|| ConformanceFailure::Mismatch("c missing from listing".into()))?;
    ensure_eq((c.version, &c.body), (1, &json!("c2")), "listing shows latest version")?;

    ensure_eq(
        ids(session.read_artifacts(&ctx, 2, 1)?),
        vec!["b".to_string(), "c".to_string()],
        "page",
    )?;
    ensure_eq(session.read_artifacts(&ctx, 10, 5)?.len(), 0, "offset past end")?;
    ensure_eq(session.read_artifacts(&ctx, 0, 0)?.len(), 0, "zero limit")
}

/// Search filters the latest versions, then paginates.
pub fn search(store: &dyn Store) -> Outcome {
    let mut session = store.session()?;
    let ctx = Context::new("search", "m", "v").map_err(StoreError::from)?;
    ensure_context(session.as_mut(), &ctx)?;

    session.write_artifact(&ctx, &value("acc", json!({"metric": {"score": 0.91}})))?;
    session.write_artifact(&ctx, &value("f1", json!({"metric": {"score": 0.42}})))?;
    session.write_artifact(&ctx, &value("latency", json!({"metric": {"ms": 12}})))?;
    session.write_artifact(&ctx, &Artifact::new("card", ArtifactType::NegotiationCard, json!({})))?;
    session.write_artifact(&ctx, &Artifact::new("report", ArtifactType::Report, json!({})))?;
    // Only the latest version of f1 takes part in the search.
    session.write_artifact(&ctx, &value("f1", json!({"metric": {"score": 0.88}})))?;

    let ids = |query: Query| -> StoreResult<Vec<String>> {
        Ok(session
            .search_artifacts(&ctx, &query)?
            .into_iter()
            .map(|a| a.identifier)
            .collect())
    };
    let strings = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    ensure_eq(
        ids(Query::default())?,
        strings(&["acc", "card", "f1", "latency", "report"]),
        "match all",
    )?;
    ensure_eq(ids(Query::new(Filter::None))?, Vec::new(), "match none")?;
    ensure_eq(
        ids(Query::new(Filter::Type {
            item_type: ArtifactType::Value,
        }))?,
        strings(&["acc", "f1", "latency"]),
        "by type",
    )?;
    ensure_eq(
        ids(Query::new(Filter::Identifier { id: "card".into() }))?,
        strings(&["card"]),
        "by identifier",
    )?;

    let good = Filter::Field {
        path: "metric.score".into(),
        condition: Condition::GreaterOrEqual { value: 0.8 },
    };
    ensure_eq(ids(Query::new(good.clone()))?, strings(&["acc", "f1"]), "by field")?;
    ensure_eq(
        ids(Query::new(Filter::Not {
            filter: Box::new(good.clone()),
        }))?,
        strings(&["card", "latency", "report"]),
        "negated field",
    )?;
    ensure_eq(
        ids(Query::new(Filter::Type {
            item_type: ArtifactType::Value,
        })
        .with_offset(1)
        .with_limit(1))?,
        strings(&["f1"]),
        "filter then paginate",
    )?;
    ensure_eq(
        ids(Query::new(Filter::Or {
            filters: vec![
                Filter::Identifier { id: "report".into() },
                Filter::And {
                    filters: vec![
                        good,
                        Filter::Field {
                            path: "metric.score".into(),
                            condition: Condition::LessThan { value: 0.9 },
                        },
                    ],
                },
            ],
        }))?,
        strings(&["f1", "report"]),
        "combined",
    )
}

/// Re-writing an artifact with another type retags every version.
pub fn type_change(store: &dyn Store) -> Outcome {
    let mut session = store.session()?;
    let ctx = Context::new("retag", "m", "v").map_err(StoreError::from)?;
    ensure_context(session.as_mut(), &ctx)?;

    session.write_artifact(&ctx, &Artifact::new("s", ArtifactType::Spec, json!(1)))?;
    session.write_artifact(&ctx, &Artifact::new("s", ArtifactType::ValidatedSpec, json!(2)))?;
    ensure_eq(
        session.read_artifact(&ctx, "s", Some(0))?.kind,
        ArtifactType::ValidatedSpec,
        "retagged first version",
    )?;
    let deleted = session.delete_artifact(&ctx, "s")?;
    ensure_eq((deleted.version, deleted.kind), (1, ArtifactType::ValidatedSpec), "deleted")?;
    expect_not_found(session.read_artifact(&ctx, "s", Some(0)), Entity::Artifact, "after delete")
}

/// Identifiers that collide with route names or carry spaces and dots are
/// stored like any other. `.`, `..` and unwritten identifiers are missing.
pub fn identifier_edge_cases(store: &dyn Store) -> Outcome {
    let mut session = store.session()?;
    let ctx = Context::new("edges", "m", "v").map_err(StoreError::from)?;
    ensure_context(session.as_mut(), &ctx)?;

    for id in ["my result.v2", "search", "artifact"] {
        let written = session.write_artifact(&ctx, &value(id, json!({"id": id})))?;
        ensure_eq(written.version, 0, id)?;
        let read = session.read_artifact(&ctx, id, None)?;
        ensure_eq((read.identifier.as_str(), read.body), (id, json!({"id": id})), id)?;
        ensure_eq(session.read_artifact(&ctx, id, Some(0))?.version, 0, id)?;
    }
    let listed: Vec<String> = session
        .read_artifacts(&ctx, 10, 0)?
        .into_iter()
        .map(|a| a.identifier)
        .collect();
    ensure_eq(listed, vec!["artifact".into(), "my result.v2".into(), "search".into()], "listed")?;
    for id in ["my result.v2", "search", "artifact"] {
        ensure_eq(session.delete_artifact(&ctx, id)?.identifier, id.to_string(), "deleted id")?;
        expect_not_found(session.read_artifact(&ctx, id, None), Entity::Artifact, id)?;
    }

    for id in [".", "..", "never-written"] {
        expect_not_found(session.read_artifact(&ctx, id, None), Entity::Artifact, id)?;
        expect_not_found(session.read_artifact(&ctx, id, Some(0)), Entity::Artifact, id)?;
        expect_not_found(session.delete_artifact(&ctx, id), Entity::Artifact, id)?;
    }
    for id in [".", ".."] {
        expect_not_found(session.read_namespace(id), Entity::Namespace, "read namespace")?;
        expect_not_found(session.delete_namespace(id), Entity::Namespace, "delete namespace")?;
        expect_not_found(session.list_models(id), Entity::Namespace, "list models")?;
        expect_not_found(session.read_model("edges", id), Entity::Model, "read model")?;
        expect_not_found(session.delete_model("edges", id), Entity::Model, "delete model")?;
        expect_not_found(session.list_versions("edges", id), Entity::Model, "list versions")?;
        expect_not_found(session.read_version("edges", "m", id), Entity::Version, "read version")?;
        expect_not_found(
            session.delete_version("edges", "m", id),
            Entity::Version,
            "delete version",
        )?;
    }
    ensure_eq(session.list_versions("edges", "m")?, vec!["v".to_string()], "versions kept")
}

/// Runs a fixed operation sequence and records every observable outcome, so
/// two backends can be compared line by line.
pub fn transcript(store: &dyn Store) -> StoreResult<Vec<String>> {
    fn record<T: Debug>(log: &mut Vec<String>, step: &str, result: StoreResult<T>) {
        let line = match result {
            Ok(value) => format!("{}: ok {:?}", step, value),
            Err(StoreError::NotFound { entity, identifier }) => {
                format!("{}: not found {} {}", step, entity, identifier)
            }
            Err(StoreError::AlreadyExists { entity, identifier }) => {
                format!("{}: already exists {} {}", step, entity, identifier)
            }
            Err(other) => format!("{}: error {}", step, other),
        };
        log.push(line);
    }

    let mut log = Vec::new();
    let mut session = store.session()?;
    let ctx = Context::new("transcript", "m", "v")?;
    let other = Context::new("transcript", "m", "w")?;

    let ns = NamespaceCreate::new("transcript");
    record(&mut log, "create ns", session.create_namespace(&ns));
    record(&mut log, "create ns again", session.create_namespace(&ns));
    record(&mut log, "create model", session.create_model("transcript", &ModelCreate::new("m")));
    record(&mut log, "write before version", session.write_artifact(&ctx, &value("a", json!(0))));
    for version in ["v", "w"] {
        let version = VersionCreate::new(version);
        record(&mut log, "create version", session.create_version("transcript", "m", &version));
    }
    for (id, body) in [("b", json!({"n": 2})), ("a", json!({"n": 1})), ("a", json!({"n": 3}))] {
        record(&mut log, "write", session.write_artifact(&ctx, &value(id, body)));
    }
    record(&mut log, "read a", session.read_artifact(&ctx, "a", None));
    record(&mut log, "read a@0", session.read_artifact(&ctx, "a", Some(0)));
    record(&mut log, "read a@9", session.read_artifact(&ctx, "a", Some(9)));
    record(&mut log, "read a in w", session.read_artifact(&other, "a", None));
    record(&mut log, "read ..", session.read_artifact(&ctx, "..", None));
    record(&mut log, "write search", session.write_artifact(&ctx, &value("search", json!(4))));
    record(&mut log, "read search", session.read_artifact(&ctx, "search", None));
    record(&mut log, "delete search", session.delete_artifact(&ctx, "search"));
    record(&mut log, "list", session.read_artifacts(&ctx, 100, 0));
    record(
        &mut log,
        "search",
        session.search_artifacts(
            &ctx,
            &Query::new(Filter::Field {
                path: "n".into(),
                condition: Condition::GreaterThan { value: 1.5 },
            }),
        ),
    );
    record(&mut log, "delete a", session.delete_artifact(&ctx, "a"));
    record(&mut log, "delete a again", session.delete_artifact(&ctx, "a"));
    record(&mut log, "read model", session.read_model("transcript", "m"));
    record(&mut log, "delete model", session.delete_model("transcript", "m"));
    record(&mut log, "read b", session.read_artifact(&ctx, "b", None));
    record(&mut log, "list models", session.list_models("transcript"));
    record(&mut log, "delete ns", session.delete_namespace("transcript"));
    record(&mut log, "list ns", session.list_namespaces());
    Ok(log)
}

/// Every scenario, in order, against one store.
pub fn run_all(store: &dyn Store) -> Outcome {
    concrete_scenario(store)?;
    version_monotonicity(store, 5)?;
    round_trip(store, ArtifactType::Report, json!({"nested": {"list": [1, "two", null]}}))?;
    hierarchy_isolation(store)?;
    duplicate_create(store)?;
    cascade_delete(store)?;
    missing_hierarchy(store)?;
    listing_and_pagination(store)?;
    search(store)?;
    type_change(store)?;
    identifier_edge_cases(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::uri::StoreUri;

    #[test]
    fn memory_store_conforms() {
        let store = MemoryStore::new(StoreUri::parse("memory://").unwrap());
        run_all(&store).unwrap();
    }

    #[test]
    fn mismatch_is_reported_not_panicked() {
        let failure = ensure_eq(1, 2, "answer").unwrap_err();
        assert_eq!(failure.to_string(), "answer: expected 2, got 1");
    }
}
