//! Storage error types for mlte-store.
//!
//! [`StoreError`] has three runtime kinds shared by every backend
//! (`NotFound`, `AlreadyExists`, `Internal`) plus two variants raised before
//! any medium is touched: `Validation` for rejected caller input and
//! `InvalidUri` for store construction failures.

use std::fmt;

use mlte_core::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Namespace,
    Model,
    Version,
    Artifact,
    User,
    /// A remote resource whose kind the server did not report.
    Resource,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Namespace => "namespace",
            Entity::Model => "model",
            Entity::Version => "version",
            Entity::Artifact => "artifact",
            Entity::User => "user",
            Entity::Resource => "resource",
        })
    }
}

/// Errors produced by store operations.
///
/// `identifier` is always the scoped key (e.g. `ns0/model0/v0/a`), so the
/// message alone pinpoints the offending entity.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed entity does not exist.
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: Entity, identifier: String },

    /// A create targeted an identifier already present at that scope.
    #[error("{entity} already exists: {identifier}")]
    AlreadyExists { entity: Entity, identifier: String },

    /// Backend medium failure (I/O, database, transport, corrupt data).
    #[error("internal store error: {0}")]
    Internal(String),

    /// Caller input rejected before reaching the backend.
    #[error("validation failed: {0}")]
    Validation(#[from] CoreError),

    /// The store URI does not select a usable backend.
    #[error("invalid store URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },
}

impl StoreError {
    pub fn not_found(entity: Entity, identifier: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            identifier: identifier.into(),
        }
    }

    pub fn already_exists(entity: Entity, identifier: impl Into<String>) -> Self {
        StoreError::AlreadyExists {
            entity,
            identifier: identifier.into(),
        }
    }

    pub fn internal(reason: impl fmt::Display) -> Self {
        StoreError::Internal(reason.to_string())
    }

    pub fn invalid_uri(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::InvalidUri {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, StoreError::Internal(_))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Internal(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Internal(format!("serialization error: {}", err))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Internal(format!("database error: {}", err))
    }
}

impl From<rusqlite_migration::Error> for StoreError {
    fn from(err: rusqlite_migration::Error) -> Self {
        StoreError::Internal(format!("schema migration failed: {}", err))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Internal(format!("transport error: {}", err))
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
