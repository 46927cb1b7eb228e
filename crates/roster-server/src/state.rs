use std::sync::{Arc, Mutex, PoisonError};

use roster_core::PhonePolicy;
use roster_store::error::StoreError;
use roster_store::Store;
use tracing::warn;

use crate::error::ApiError;

/// Shared handler state. The store is only touched from the blocking pool.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Store>>,
    phone_policy: Arc<PhonePolicy>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        let phone_policy = Arc::new(store.phone_policy().clone());
        Self {
            store: Arc::new(Mutex::new(store)),
            phone_policy,
        }
    }

    pub fn phone_policy(&self) -> &PhonePolicy {
        &self.phone_policy
    }

    /// Runs `f` with exclusive access to the store on tokio's blocking pool.
    /// The lock is released when `f` returns, whatever the outcome.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Store) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let guard = store.lock().unwrap_or_else(PoisonError::into_inner);
            f(&guard).map_err(ApiError::from)
        })
        .await
        .map_err(ApiError::internal)?
    }

    /// Closes the store once no handler holds a reference to it.
    pub fn close(self) -> Result<(), StoreError> {
        match Arc::try_unwrap(self.store) {
            Ok(store) => store.into_inner().unwrap_or_else(PoisonError::into_inner).close(),
            Err(_) => {
                warn!("store still shared at shutdown, leaving it to drop");
                Ok(())
            }
        }
    }
}
