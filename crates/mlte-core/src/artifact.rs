//! Versioned evaluation artifacts and the artifact type registry.
//!
//! An [`Artifact`] is an opaque JSON body identified within a
//! [`Context`](crate::Context) and tagged with an [`ArtifactType`]. The store
//! assigns the integer version; whatever version a caller sets on a write is
//! ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::validate_identifier;
use crate::error::CoreError;

/// The closed set of artifact kinds.
///
/// The tag table is static: [`ArtifactType::from_tag`] is the only way an
/// external string becomes an `ArtifactType`, and it rejects anything that is
/// not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ArtifactType {
    NegotiationCard,
    Value,
    Spec,
    ValidatedSpec,
    Report,
}

impl ArtifactType {
    /// Every registered type, in tag order.
    pub const ALL: [ArtifactType; 5] = [
        ArtifactType::NegotiationCard,
        ArtifactType::Value,
        ArtifactType::Spec,
        ArtifactType::ValidatedSpec,
        ArtifactType::Report,
    ];

    /// The stable tag used on the wire, on disk and in the database.
    pub fn tag(self) -> &'static str {
        match self {
            ArtifactType::NegotiationCard => "negotiation_card",
            ArtifactType::Value => "value",
            ArtifactType::Spec => "spec",
            ArtifactType::ValidatedSpec => "validated_spec",
            ArtifactType::Report => "report",
        }
    }

    /// Looks a tag up in the registry.
    pub fn from_tag(tag: &str) -> Result<Self, CoreError> {
        ArtifactType::ALL
            .into_iter()
            .find(|t| t.tag() == tag)
            .ok_or_else(|| CoreError::UnknownArtifactType {
                tag: tag.to_string(),
            })
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ArtifactType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactType::from_tag(s)
    }
}

impl TryFrom<String> for ArtifactType {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ArtifactType::from_tag(&s)
    }
}

impl From<ArtifactType> for String {
    fn from(t: ArtifactType) -> Self {
        t.tag().to_string()
    }
}

/// A single artifact at one version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Identifier, unique within its context.
    pub identifier: String,
    /// Artifact type tag.
    #[serde(rename = "type")]
    pub kind: ArtifactType,
    /// Opaque payload.
    pub body: serde_json::Value,
    /// Store-assigned version number (0 for the first write).
    #[serde(default)]
    pub version: u64,
}

impl Artifact {
    /// Creates an unversioned artifact ready to be written.
    pub fn new(identifier: impl Into<String>, kind: ArtifactType, body: serde_json::Value) -> Self {
        Artifact {
            identifier: identifier.into(),
            kind,
            body,
            version: 0,
        }
    }

    /// Validates the identifier for storage.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_identifier("artifact", &self.identifier)
    }

    /// Returns a copy carrying the given store-assigned version.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_tag_resolves_to_its_type() {
        for kind in ArtifactType::ALL {
            assert_eq!(ArtifactType::from_tag(kind.tag()).unwrap(), kind);
            assert_eq!(kind.tag().parse::<ArtifactType>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = ArtifactType::from_tag("pickled_class").unwrap_err();
        assert_eq!(
            err,
            CoreError::UnknownArtifactType {
                tag: "pickled_class".to_string()
            }
        );
    }

    #[test]
    fn artifact_serializes_with_type_tag() {
        let artifact = Artifact::new("a", ArtifactType::NegotiationCard, json!({"v": 1}));
        let value = serde_json::to_value(&artifact).unwrap();
        assert_eq!(
            value,
            json!({"identifier": "a", "type": "negotiation_card", "body": {"v": 1}, "version": 0})
        );
    }

    #[test]
    fn artifact_with_unknown_type_fails_to_deserialize() {
        let result: Result<Artifact, _> =
            serde_json::from_value(json!({"identifier": "a", "type": "bogus", "body": null}));
        assert!(result.is_err());
    }

    #[test]
    fn version_defaults_to_zero() {
        let artifact: Artifact =
            serde_json::from_value(json!({"identifier": "a", "type": "value", "body": 3})).unwrap();
        assert_eq!(artifact.version, 0);
        assert_eq!(artifact.with_version(4).version, 4);
    }
}
