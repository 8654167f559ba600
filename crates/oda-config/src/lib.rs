//! Typed config object graph: model, agent, and MCP config records, with
//! built-in (in-memory, immutable) and custom (persisted, mutable) tiers.

#![warn(missing_docs)]

pub mod error;
pub mod model;
pub mod store;
pub mod types;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::{BootstrapModelDefaults, ModelConfigManager};
pub use store::{ConfigRecord, ConfigStore, Keyed, MemoryConfigStore};
#[cfg(feature = "sql")]
pub use store::SqlConfigStore;
pub use types::{AgentConfig, McpConfig, McpKey, McpServerType, ModelConfig, StoreKey};
pub use validate::validate_mcp_config;
