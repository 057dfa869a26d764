//! Core error types for mlte-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the data model itself: identifiers rejected before they
//! reach any storage medium and unknown artifact type tags.

use thiserror::Error;

/// Core errors produced by the mlte-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An identifier is empty or contains characters no backend can store.
    #[error("invalid {kind} identifier '{identifier}': {reason}")]
    InvalidIdentifier {
        kind: &'static str,
        identifier: String,
        reason: &'static str,
    },

    /// A type tag that is not in the artifact type registry.
    #[error("unknown artifact type: '{tag}'")]
    UnknownArtifactType { tag: String },
}
