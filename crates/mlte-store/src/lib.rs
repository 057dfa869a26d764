//! Artifact storage for MLTE.
//!
//! A store is selected by URI through [`create_store`] and accessed through
//! sessions implementing [`StoreSession`]. Four backends honor the same
//! contract:
//!
//! - [`MemoryStore`] (`memory://`), the reference semantics
//! - [`LocalStore`] (`local://<root>`), JSON documents in a directory tree
//! - [`RelationalStore`] (`sqlite://<path>`), SQLite via rusqlite
//! - [`RemoteHttpStore`] (`http(s)://...`), a client of `mlte-server`
//!
//! [`conformance`] holds the scenarios every backend is tested against.

pub mod conformance;
pub mod document;
pub mod error;
pub mod factory;
pub mod http;
pub mod local;
pub mod memory;
pub mod reader;
pub mod relational;
pub mod schema;
pub mod traits;
pub mod uri;

pub use error::{Entity, StoreError, StoreResult};
pub use factory::{create_store, create_user_store};
pub use http::{
    ErrorBody, ErrorDetails, ErrorEnvelope, HttpClient, HttpMethod, HttpRequest, HttpResponse,
    RemoteHttpStore, ReqwestClient,
};
pub use local::LocalStore;
pub use memory::{MemoryStore, MemoryUserStore};
pub use relational::{RelationalStore, RelationalUserStore};
pub use traits::{Store, StoreSession, UserStore, UserStoreSession};
pub use uri::{StoreType, StoreUri};
