//! Building stores from URIs.

use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::http::RemoteHttpStore;
use crate::local::LocalStore;
use crate::memory::{MemoryStore, MemoryUserStore};
use crate::relational::{RelationalStore, RelationalUserStore};
use crate::traits::{Store, UserStore};
use crate::uri::{StoreType, StoreUri};

/// Builds the artifact store selected by `uri`.
pub fn create_store(uri: &str) -> StoreResult<Box<dyn Store>> {
    let uri = StoreUri::parse(uri)?;
    let store_type = uri.store_type();
    let store: Box<dyn Store> = match store_type {
        StoreType::Memory => Box::new(MemoryStore::new(uri)),
        StoreType::Local => Box::new(LocalStore::new(uri)?),
        StoreType::Relational => Box::new(RelationalStore::new(uri)?),
        StoreType::RemoteHttp => Box::new(RemoteHttpStore::new(uri)?),
    };
    info!(%store_type, uri = %store.uri(), "artifact store ready");
    Ok(store)
}

/// Builds the user store selected by `uri`. Only memory and relational
/// backends hold users.
pub fn create_user_store(uri: &str) -> StoreResult<Box<dyn UserStore>> {
    let uri = StoreUri::parse(uri)?;
    match uri.store_type() {
        StoreType::Memory => Ok(Box::new(MemoryUserStore::new(uri))),
        StoreType::Relational => Ok(Box::new(RelationalUserStore::new(uri)?)),
        other => Err(StoreError::invalid_uri(
            uri.as_str(),
            format!("{} backend has no user store", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_each_local_backend() {
        let dir = tempfile::tempdir().unwrap();

        let memory = create_store("memory://").unwrap();
        assert_eq!(memory.uri().store_type(), StoreType::Memory);

        let local = create_store(&format!("local://{}", dir.path().display())).unwrap();
        assert_eq!(local.uri().store_type(), StoreType::Local);

        let db = dir.path().join("mlte.db");
        let relational = create_store(&format!("sqlite://{}", db.display())).unwrap();
        assert_eq!(relational.uri().store_type(), StoreType::Relational);
        assert!(db.is_file());
    }

    #[test]
    fn unknown_scheme_is_invalid() {
        assert!(matches!(
            create_store("s3://bucket").err(),
            Some(StoreError::InvalidUri { .. })
        ));
    }

    #[test]
    fn user_store_backends() {
        assert!(create_user_store("memory://").is_ok());

        let dir = tempfile::tempdir().unwrap();
        let err = create_user_store(&format!("local://{}", dir.path().display())).err();
        assert!(matches!(err, Some(StoreError::InvalidUri { .. })));
    }
}
