//! In-memory `ConfigStore` backed by a locked hash map.

use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use oda_core::OdaError;
use tokio::sync::RwLock;

use super::{ConfigStore, Keyed};
use crate::error::ConfigResult;
use crate::types::StoreKey;

/// A `ConfigStore` that keeps records in a `RwLock<HashMap<..>>` for the life
/// of the process. Used for the built-in tier and for tests; never persisted.
pub struct MemoryConfigStore<T> {
    records: RwLock<HashMap<StoreKey, T>>,
    _marker: PhantomData<T>,
}

impl<T> MemoryConfigStore<T> {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            _marker: PhantomData,
        }
    }
}

impl<T> Default for MemoryConfigStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> ConfigStore<T> for MemoryConfigStore<T>
where
    T: Keyed + Clone + Send + Sync,
{
    async fn create(&self, record: T) -> ConfigResult<()> {
        let key = record.store_key();
        let mut records = self.records.write().await;
        if records.contains_key(&key) {
            return Err(OdaError::AlreadyExists(format!("{}:{}", key.0, key.1)).into());
        }
        records.insert(key, record);
        Ok(())
    }

    async fn get(&self, key: &StoreKey) -> ConfigResult<Option<T>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn update(&self, record: T) -> ConfigResult<()> {
        let key = record.store_key();
        let mut records = self.records.write().await;
        if !records.contains_key(&key) {
            return Err(OdaError::NotFound(format!("{}:{}", key.0, key.1)).into());
        }
        records.insert(key, record);
        Ok(())
    }

    async fn delete(&self, key: &StoreKey) -> ConfigResult<()> {
        self.records.write().await.remove(key);
        Ok(())
    }

    async fn list(&self) -> ConfigResult<Vec<T>> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}
