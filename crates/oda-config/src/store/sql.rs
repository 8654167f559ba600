//! `SurrealDB`-backed `ConfigStore`, for the persisted (custom) tier.

use std::marker::PhantomData;

use async_trait::async_trait;
use oda_core::OdaError;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;

use super::{ConfigRecord, ConfigStore};
use crate::error::{ConfigError, ConfigResult};
use crate::types::StoreKey;

/// Combine a `StoreKey` into the record id `SurrealDB` stores it under.
fn record_id(key: &StoreKey) -> String {
    format!("{}:{}", key.0, key.1)
}

/// A [`ConfigStore`] persisted to `SurrealDB`.
///
/// Connects embedded via `surrealkv://path` for on-disk durability, or
/// `mem://` for tests. One namespace (`oda`) holds one database per
/// deployment; record kind `T` maps to its own table via [`ConfigRecord::table_name`].
pub struct SqlConfigStore<T> {
    db: Surreal<Any>,
    _marker: PhantomData<T>,
}

impl<T: ConfigRecord> SqlConfigStore<T> {
    /// Connect to an embedded `SurrealKV` database rooted at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Storage`] if the connection fails.
    pub async fn connect_embedded(path: &str) -> ConfigResult<Self> {
        Self::connect(&format!("surrealkv://{path}")).await
    }

    /// Connect to an in-memory database, for tests.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Storage`] if the connection fails.
    pub async fn connect_memory() -> ConfigResult<Self> {
        Self::connect("mem://").await
    }

    async fn connect(endpoint: &str) -> ConfigResult<Self> {
        let db: Surreal<Any> = Surreal::init();
        db.connect(endpoint)
            .await
            .map_err(|e| ConfigError::Storage(e.to_string()))?;
        db.use_ns("oda")
            .use_db("config")
            .await
            .map_err(|e| ConfigError::Storage(e.to_string()))?;
        Ok(Self {
            db,
            _marker: PhantomData,
        })
    }
}

#[async_trait]
impl<T: ConfigRecord> ConfigStore<T> for SqlConfigStore<T> {
    async fn create(&self, record: T) -> ConfigResult<()> {
        let key = record.store_key();
        let existing: Option<T> = self
            .db
            .select((T::table_name(), record_id(&key)))
            .await
            .map_err(|e| ConfigError::Storage(e.to_string()))?;
        if existing.is_some() {
            return Err(OdaError::AlreadyExists(format!("{}:{}", key.0, key.1)).into());
        }
        let _: Option<T> = self
            .db
            .create((T::table_name(), record_id(&key)))
            .content(record)
            .await
            .map_err(|e| ConfigError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, key: &StoreKey) -> ConfigResult<Option<T>> {
        self.db
            .select((T::table_name(), record_id(key)))
            .await
            .map_err(|e| ConfigError::Storage(e.to_string()))
    }

    async fn update(&self, record: T) -> ConfigResult<()> {
        let key = record.store_key();
        let existing: Option<T> = self
            .db
            .select((T::table_name(), record_id(&key)))
            .await
            .map_err(|e| ConfigError::Storage(e.to_string()))?;
        if existing.is_none() {
            return Err(OdaError::NotFound(format!("{}:{}", key.0, key.1)).into());
        }
        let _: Option<T> = self
            .db
            .update((T::table_name(), record_id(&key)))
            .content(record)
            .await
            .map_err(|e| ConfigError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &StoreKey) -> ConfigResult<()> {
        let _: Option<T> = self
            .db
            .delete((T::table_name(), record_id(key)))
            .await
            .map_err(|e| ConfigError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn list(&self) -> ConfigResult<Vec<T>> {
        self.db
            .select(T::table_name())
            .await
            .map_err(|e| ConfigError::Storage(e.to_string()))
    }
}
