//! Store URI parsing.
//!
//! | prefix | backend |
//! |---|---|
//! | `memory://` | in-memory |
//! | `local://<path>` | local filesystem, `<path>` must exist |
//! | `sqlite://<path>` and other database URLs | relational |
//! | `http://` / `https://` | remote HTTP |
//!
//! For `sqlite://` everything after the prefix is the database path, so
//! `sqlite:///var/lib/mlte.db` is absolute and `sqlite://mlte.db` is relative.

use std::fmt;

use crate::error::{StoreError, StoreResult};

pub const MEMORY_PREFIX: &str = "memory://";
pub const LOCAL_PREFIX: &str = "local://";
pub const SQLITE_PREFIX: &str = "sqlite://";
pub const HTTP_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Database URL schemes recognized as relational. Only SQLite has a driver in
/// this workspace; the others are rejected when the store is built.
pub const DATABASE_SCHEMES: [&str; 6] = [
    "sqlite",
    "postgresql",
    "postgres",
    "mysql",
    "mariadb",
    "mssql",
];

/// The backend selected by a URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    Memory,
    Local,
    Relational,
    RemoteHttp,
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreType::Memory => "memory",
            StoreType::Local => "local",
            StoreType::Relational => "relational",
            StoreType::RemoteHttp => "http",
        })
    }
}

/// A parsed store URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreUri {
    uri: String,
    store_type: StoreType,
}

impl StoreUri {
    /// Parses a URI, failing with `InvalidUri` when no backend matches.
    pub fn parse(uri: &str) -> StoreResult<Self> {
        let store_type = if uri.starts_with(MEMORY_PREFIX) {
            StoreType::Memory
        } else if uri.starts_with(LOCAL_PREFIX) {
            StoreType::Local
        } else if HTTP_PREFIXES.iter().any(|p| uri.starts_with(p)) {
            StoreType::RemoteHttp
        } else if DATABASE_SCHEMES.contains(&scheme(uri).unwrap_or_default()) {
            StoreType::Relational
        } else {
            return Err(StoreError::invalid_uri(uri, "unrecognized scheme"));
        };
        Ok(StoreUri {
            uri: uri.to_string(),
            store_type,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }

    pub fn store_type(&self) -> StoreType {
        self.store_type
    }

    /// The URI scheme without any `+driver` suffix, e.g. `postgresql` for
    /// `postgresql+psycopg2://...`.
    pub fn scheme(&self) -> &str {
        scheme(&self.uri).unwrap_or_default()
    }

    /// The text following `scheme://`.
    pub fn remainder(&self) -> &str {
        self.uri
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or_default()
    }
}

impl fmt::Display for StoreUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

fn scheme(uri: &str) -> Option<&str> {
    let (scheme, _) = uri.split_once("://")?;
    Some(scheme.split('+').next().unwrap_or(scheme))
}
