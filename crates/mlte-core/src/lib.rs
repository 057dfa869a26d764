//! Data model for the MLTE artifact store.
//!
//! Everything here is storage-agnostic: hierarchical addressing
//! ([`Context`] and the namespace/model/version entities), versioned
//! [`Artifact`]s with their static type registry, the [`Query`] search
//! language and the [`Condition`] predicates it is built from, and the
//! [`User`] record of the companion user store.

pub mod artifact;
pub mod condition;
pub mod context;
pub mod error;
pub mod query;
pub mod user;

// Re-export commonly used types
pub use artifact::{Artifact, ArtifactType};
pub use condition::Condition;
pub use context::{
    validate_identifier, Context, Model, ModelCreate, Namespace, NamespaceCreate, Version,
    VersionCreate,
};
pub use error::CoreError;
pub use query::{paginate, Filter, Query, DEFAULT_LIMIT};
pub use user::User;
