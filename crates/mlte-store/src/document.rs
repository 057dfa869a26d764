//! The versioned artifact document shared by the memory and filesystem
//! backends.
//!
//! On disk it is exactly the JSON object
//! `{"identifier": ..., "tag": ..., "versions": [{"version": n, "data": ...}]}`
//! with versions in append order.

use mlte_core::{Artifact, ArtifactType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stored version of an artifact body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub version: u64,
    pub data: Value,
}

/// All versions of one artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDocument {
    pub identifier: String,
    pub tag: ArtifactType,
    pub versions: Vec<DocumentVersion>,
}

impl ArtifactDocument {
    /// A fresh document holding `artifact` at version 0.
    pub fn create(artifact: &Artifact) -> Self {
        ArtifactDocument {
            identifier: artifact.identifier.clone(),
            tag: artifact.kind,
            versions: vec![DocumentVersion {
                version: 0,
                data: artifact.body.clone(),
            }],
        }
    }

    /// Appends `artifact` as version `max + 1` and adopts its type tag.
    /// Returns the assigned version.
    pub fn append(&mut self, artifact: &Artifact) -> u64 {
        let next = self.latest_version().map_or(0, |v| v + 1);
        self.tag = artifact.kind;
        self.versions.push(DocumentVersion {
            version: next,
            data: artifact.body.clone(),
        });
        next
    }

    pub fn latest_version(&self) -> Option<u64> {
        self.versions.iter().map(|v| v.version).max()
    }

    /// The requested version, or the highest one when `version` is `None`.
    pub fn get(&self, version: Option<u64>) -> Option<Artifact> {
        let target = match version {
            Some(v) => v,
            None => self.latest_version()?,
        };
        self.versions
            .iter()
            .find(|v| v.version == target)
            .map(|v| self.to_artifact(v))
    }

    pub fn latest(&self) -> Option<Artifact> {
        self.get(None)
    }

    fn to_artifact(&self, stored: &DocumentVersion) -> Artifact {
        Artifact::new(self.identifier.clone(), self.tag, stored.data.clone())
            .with_version(stored.version)
    }
}
