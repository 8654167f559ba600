//! Bootstrap configuration consumed by [`crate::Context`] at `start()`.
//!
//! The core never parses environment variables or CLI flags itself; this is a
//! plain, `toml`-deserializable shape a host can load from a file, matching
//! the teacher's `ServersConfig::load`/`load_default` pattern.

use serde::{Deserialize, Serialize};

/// Which `ConfigStore` variant backs each config kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// In-memory, process-lifetime stores.
    Memory,
    /// `SurrealDB`-backed persisted stores (requires the `sql` feature).
    Sql,
}

/// Host-supplied bootstrap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Which store variant to construct for each config kind.
    #[serde(default = "default_storage")]
    pub storage: StorageBackend,
    /// Filesystem path for the embedded `SurrealKV` database, when `storage = sql`.
    #[serde(default)]
    pub sql_path: Option<String>,
    /// Default provider base URL for the built-in model config.
    #[serde(default)]
    pub default_llm_base_url: Option<String>,
    /// Default provider API key for the built-in model config.
    #[serde(default)]
    pub default_llm_api_key: Option<String>,
    /// Default model name for the built-in model config.
    #[serde(default)]
    pub default_llm_model: Option<String>,
    /// Optional cap on concurrently held sessions.
    #[serde(default)]
    pub max_concurrent_sessions: Option<usize>,
}

fn default_storage() -> StorageBackend {
    StorageBackend::Memory
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Memory,
            sql_path: None,
            default_llm_base_url: None,
            default_llm_api_key: None,
            default_llm_model: None,
            max_concurrent_sessions: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_toml_with_defaults() {
        let cfg: BootstrapConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.storage, StorageBackend::Memory);
        assert!(cfg.default_llm_base_url.is_none());
    }

    #[test]
    fn deserializes_explicit_fields() {
        let cfg: BootstrapConfig = toml::from_str(
            r#"
            storage = "sql"
            sql_path = "/var/lib/oda"
            default_llm_base_url = "https://api.example.com"
            default_llm_api_key = "secret"
            default_llm_model = "gpt-4"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.storage, StorageBackend::Sql);
        assert_eq!(cfg.sql_path.as_deref(), Some("/var/lib/oda"));
        assert_eq!(cfg.default_llm_model.as_deref(), Some("gpt-4"));
    }
}
