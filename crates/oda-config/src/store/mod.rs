//! `ConfigStore<T>` — the storage abstraction shared by every config kind.

pub mod memory;
#[cfg(feature = "sql")]
pub mod sql;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ConfigResult;
use crate::types::{AgentConfig, McpConfig, ModelConfig, StoreKey};

pub use memory::MemoryConfigStore;
#[cfg(feature = "sql")]
pub use sql::SqlConfigStore;

/// A config record that can be stored under a `(app_name, inner_id)` key.
pub trait Keyed {
    /// The key this record is stored and looked up under.
    fn store_key(&self) -> StoreKey;
}

impl Keyed for ModelConfig {
    fn store_key(&self) -> StoreKey {
        (self.app_name.clone(), self.model_id.clone())
    }
}

impl Keyed for AgentConfig {
    fn store_key(&self) -> StoreKey {
        (self.app_name.clone(), self.agent_name.clone())
    }
}

impl Keyed for McpConfig {
    fn store_key(&self) -> StoreKey {
        (self.app_name.clone(), self.mcp_id.clone())
    }
}

/// A record kind usable with [`SqlConfigStore`]: keyed, serializable, and named.
pub trait ConfigRecord: Keyed + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The table name this kind is persisted under.
    fn table_name() -> &'static str;
}

impl ConfigRecord for ModelConfig {
    fn table_name() -> &'static str {
        "model_config"
    }
}

impl ConfigRecord for AgentConfig {
    fn table_name() -> &'static str {
        "agent_config"
    }
}

impl ConfigRecord for McpConfig {
    fn table_name() -> &'static str {
        "mcp_config"
    }
}

/// Typed CRUD over config records of kind `T`, keyed by `(app_name, inner_id)`.
///
/// Implementations must serialize per-key operations and provide at-least-once
/// read-after-write within a single process. Cross-key atomicity is not required.
#[async_trait]
pub trait ConfigStore<T: Keyed + Clone + Send + Sync>: Send + Sync {
    /// Create a new record.
    ///
    /// # Errors
    ///
    /// Returns [`oda_core::OdaError::AlreadyExists`] if the key is already present.
    async fn create(&self, record: T) -> ConfigResult<()>;

    /// Look up a record by key.
    async fn get(&self, key: &StoreKey) -> ConfigResult<Option<T>>;

    /// Replace an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`oda_core::OdaError::NotFound`] if the key does not already exist.
    async fn update(&self, record: T) -> ConfigResult<()>;

    /// Delete a record by key. Idempotent: deleting an absent key is not an error.
    async fn delete(&self, key: &StoreKey) -> ConfigResult<()>;

    /// List every record in the store.
    async fn list(&self) -> ConfigResult<Vec<T>>;
}
