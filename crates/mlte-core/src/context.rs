//! Hierarchical addressing: namespace / model / version.
//!
//! Every artifact operation is scoped by a [`Context`], an immutable triple
//! that can only be built from identifiers accepted by
//! [`validate_identifier`]. The structural entities themselves
//! ([`Namespace`], [`Model`], [`Version`]) and their create payloads live here
//! too, since they are what the store returns for structural reads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Separator used when rendering a context or scoped key as a single string.
pub const KEY_SEPARATOR: char = '/';

/// Checks that `identifier` can be used as a hierarchy or artifact identifier
/// in every backend.
///
/// Rejected: the empty string, `.` and `..`, path separators (`/`, `\`),
/// and control characters. Spaces are allowed; the filesystem backend
/// normalizes them when naming files.
pub fn validate_identifier(kind: &'static str, identifier: &str) -> Result<(), CoreError> {
    let reject = |reason| {
        Err(CoreError::InvalidIdentifier {
            kind,
            identifier: identifier.to_string(),
            reason,
        })
    };

    if identifier.is_empty() {
        return reject("must not be empty");
    }
    if identifier == "." || identifier == ".." {
        return reject("must not be a relative path component");
    }
    if identifier.contains(['/', '\\']) {
        return reject("must not contain path separators");
    }
    if identifier.chars().any(char::is_control) {
        return reject("must not contain control characters");
    }
    Ok(())
}

/// The (namespace, model, version) triple scoping an artifact operation.
///
/// Fields are private so a `Context` always holds validated identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Context {
    namespace: String,
    model: String,
    version: String,
}

impl Context {
    /// Builds a context, validating all three identifiers.
    pub fn new(
        namespace: impl Into<String>,
        model: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let (namespace, model, version) = (namespace.into(), model.into(), version.into());
        validate_identifier("namespace", &namespace)?;
        validate_identifier("model", &model)?;
        validate_identifier("version", &version)?;
        Ok(Context {
            namespace,
            model,
            version,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Canonical scoping key, `namespace/model/version`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Canonical key of an artifact within this context,
    /// `namespace/model/version/artifact`.
    pub fn artifact_key(&self, artifact_id: &str) -> String {
        format!("{}{}{}", self, KEY_SEPARATOR, artifact_id)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.namespace,
            self.model,
            self.version,
            sep = KEY_SEPARATOR
        )
    }
}

/// Scoped key of a model, `namespace/model`.
pub fn model_key(namespace_id: &str, model_id: &str) -> String {
    format!("{}{}{}", namespace_id, KEY_SEPARATOR, model_id)
}

/// Scoped key of a version, `namespace/model/version`.
pub fn version_key(namespace_id: &str, model_id: &str, version_id: &str) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        namespace_id,
        model_id,
        version_id,
        sep = KEY_SEPARATOR
    )
}

// ---------------------------------------------------------------------------
// Structural entities
// ---------------------------------------------------------------------------

/// Request payload to create a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceCreate {
    pub identifier: String,
}

/// Request payload to create a model within a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCreate {
    pub identifier: String,
}

/// Request payload to create a version within a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCreate {
    pub identifier: String,
}

/// A namespace and the identifiers of the models it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub identifier: String,
    #[serde(default)]
    pub models: Vec<String>,
}

/// A model and the identifiers of the versions it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub identifier: String,
    #[serde(default)]
    pub versions: Vec<String>,
}

/// A model version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub identifier: String,
}

impl NamespaceCreate {
    pub fn new(identifier: impl Into<String>) -> Self {
        NamespaceCreate {
            identifier: identifier.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_identifier("namespace", &self.identifier)
    }
}

impl ModelCreate {
    pub fn new(identifier: impl Into<String>) -> Self {
        ModelCreate {
            identifier: identifier.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_identifier("model", &self.identifier)
    }
}

impl VersionCreate {
    pub fn new(identifier: impl Into<String>) -> Self {
        VersionCreate {
            identifier: identifier.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_identifier("version", &self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_key_joins_identifiers() {
        let ctx = Context::new("ns0", "model0", "v0").unwrap();
        assert_eq!(ctx.key(), "ns0/model0/v0");
        assert_eq!(ctx.artifact_key("a"), "ns0/model0/v0/a");
        assert_eq!(version_key("ns0", "model0", "v0"), ctx.key());
        assert_eq!(model_key("ns0", "model0"), "ns0/model0");
    }

    #[test]
    fn empty_identifier_is_rejected() {
        let err = Context::new("ns0", "", "v0").unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidIdentifier { kind: "model", .. }
        ));
    }

    #[test]
    fn path_separators_are_rejected() {
        assert!(validate_identifier("namespace", "a/b").is_err());
        assert!(validate_identifier("namespace", "a\\b").is_err());
        assert!(validate_identifier("namespace", "..").is_err());
        assert!(validate_identifier("namespace", ".").is_err());
        assert!(validate_identifier("namespace", "tab\there").is_err());
    }

    #[test]
    fn spaces_and_punctuation_are_accepted() {
        assert!(validate_identifier("artifact", "my result.v2").is_ok());
        assert!(validate_identifier("artifact", "card-1_final").is_ok());
        assert!(Context::new("team a", "resnet.50", "2024-01").is_ok());
    }

    #[test]
    fn create_payloads_validate() {
        assert!(NamespaceCreate::new("ns").validate().is_ok());
        assert!(ModelCreate::new("").validate().is_err());
        assert!(VersionCreate::new("v/1").validate().is_err());
    }

    #[test]
    fn namespace_deserializes_without_models() {
        let ns: Namespace = serde_json::from_str(r#"{"identifier": "ns0"}"#).unwrap();
        assert_eq!(ns.identifier, "ns0");
        assert!(ns.models.is_empty());
    }
}
