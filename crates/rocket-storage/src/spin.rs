//! Spin Key-Value Store backend.

use crate::{StorageError, Store};

/// Store backed by Spin's Key-Value Store.
pub struct SpinStore {
    store: spin_sdk::key_value::Store,
}

impl SpinStore {
    /// Open the default Key-Value store.
    pub fn open_default() -> Result<Self, StorageError> {
        let store = spin_sdk::key_value::Store::open_default()
            .map_err(|e| StorageError::OpenError(e.to_string()))?;
        Ok(Self { store })
    }

    /// Open a named Key-Value store. The name acts as the scope.
    pub fn open(scope: &str) -> Result<Self, StorageError> {
        let store = spin_sdk::key_value::Store::open(scope)
            .map_err(|e| StorageError::OpenError(e.to_string()))?;
        Ok(Self { store })
    }
}

impl Store for SpinStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.store
            .get(key)
            .map_err(|e| StorageError::StoreError(e.to_string()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.store
            .set(key, value)
            .map_err(|e| StorageError::StoreError(e.to_string()))
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.store
            .delete(key)
            .map_err(|e| StorageError::StoreError(e.to_string()))
    }

    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        self.store
            .exists(key)
            .map_err(|e| StorageError::StoreError(e.to_string()))
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.store
            .get_keys()
            .map_err(|e| StorageError::StoreError(e.to_string()))
    }
}
