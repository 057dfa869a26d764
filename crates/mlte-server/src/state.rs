//! Shared application state.
//!
//! The store contract is blocking, so every request runs its store calls on
//! tokio's blocking pool through [`AppState::with_session`]. The session is
//! opened inside that task and dropped when the closure returns.

use std::sync::Arc;

use mlte_store::{Store, StoreResult, StoreSession};

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        AppState { store }
    }

    /// Runs `op` against a fresh session on the blocking pool.
    pub async fn with_session<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut dyn StoreSession) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || {
            let mut session = store.session()?;
            op(session.as_mut())
        })
        .await?;
        Ok(result?)
    }
}
