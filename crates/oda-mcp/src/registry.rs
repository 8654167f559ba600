//! `McpManager` — built-in (memory) and custom (persisted) MCP config tiers.

use std::collections::HashMap;
use std::sync::Arc;

use oda_config::{validate_mcp_config, ConfigStore, McpConfig, McpKey};
use oda_core::OdaError;
use oda_engine::ToolsetHandle;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::McpResult;
use crate::toolset::McpToolsetHandle;

fn global_key(key: &McpKey) -> String {
    format!("{}:{}", key.0, key.1)
}

/// CRUD manager for [`McpConfig`] records, split into an immutable built-in
/// tier and a mutable, persisted custom tier.
pub struct McpManager {
    builtins: RwLock<HashMap<McpKey, McpConfig>>,
    custom: Arc<dyn ConfigStore<McpConfig>>,
}

impl McpManager {
    /// Construct a manager with no built-ins registered yet.
    #[must_use]
    pub fn new(custom: Arc<dyn ConfigStore<McpConfig>>) -> Self {
        Self {
            builtins: RwLock::new(HashMap::new()),
            custom,
        }
    }

    /// Register a built-in MCP config.
    ///
    /// # Errors
    ///
    /// Returns `OdaError::ValidationError` if the server-type/parameter invariant
    /// is violated, or `OdaError::AlreadyExists` if the key is already registered.
    pub async fn register_builtin(&self, config: McpConfig) -> McpResult<()> {
        validate_mcp_config(&config)?;
        let key = (config.app_name.clone(), config.mcp_id.clone());
        let mut builtins = self.builtins.write().await;
        if builtins.contains_key(&key) {
            return Err(OdaError::AlreadyExists(global_key(&key)).into());
        }
        info!(mcp_id = %config.mcp_id, app_name = %config.app_name, "registered built-in mcp config");
        builtins.insert(key, config);
        Ok(())
    }

    /// Built-ins are permanent; this always fails.
    ///
    /// # Errors
    ///
    /// Always returns `OdaError::NotPermitted`.
    pub async fn unregister_builtin(&self, key: &McpKey) -> McpResult<()> {
        Err(OdaError::NotPermitted(global_key(key)).into())
    }

    /// Create a custom MCP config.
    ///
    /// # Errors
    ///
    /// Returns `OdaError::ValidationError` on invariant violation, or
    /// `OdaError::AlreadyExists` if the key already exists in the custom tier.
    pub async fn register_custom(&self, config: McpConfig) -> McpResult<()> {
        validate_mcp_config(&config)?;
        self.custom.create(config).await?;
        Ok(())
    }

    /// Replace an existing custom MCP config.
    ///
    /// # Errors
    ///
    /// Returns `OdaError::ValidationError` on invariant violation, or
    /// `OdaError::NotFound` if the key does not exist in the custom tier.
    pub async fn update_custom(&self, config: McpConfig) -> McpResult<()> {
        validate_mcp_config(&config)?;
        self.custom.update(config).await?;
        Ok(())
    }

    /// Delete a custom MCP config. Idempotent.
    ///
    /// # Errors
    ///
    /// Propagates any underlying store error.
    pub async fn unregister_custom(&self, key: &McpKey) -> McpResult<()> {
        self.custom.delete(key).await?;
        Ok(())
    }

    /// Look up a config by key, consulting the built-in tier first.
    pub async fn get(&self, key: &McpKey) -> McpResult<Option<McpConfig>> {
        if let Some(c) = self.builtins.read().await.get(key) {
            debug!(mcp_id = %key.1, "resolved mcp config from built-in tier");
            return Ok(Some(c.clone()));
        }
        Ok(self.custom.get(key).await?)
    }

    /// Union of both tiers for `app_name`, keyed `"app_name:mcp_id"`.
    pub async fn list(&self, app_name: &str) -> McpResult<Vec<(String, McpConfig)>> {
        let mut out: Vec<(String, McpConfig)> = self
            .builtins
            .read()
            .await
            .iter()
            .filter(|(k, _)| k.0 == app_name)
            .map(|(k, v)| (global_key(k), v.clone()))
            .collect();
        out.extend(
            self.custom
                .list()
                .await?
                .into_iter()
                .filter(|c| c.app_name == app_name)
                .map(|c| (global_key(&(c.app_name.clone(), c.mcp_id.clone())), c)),
        );
        Ok(out)
    }

    /// Resolve `key` and return a fresh, uncached tool-set handle.
    ///
    /// # Errors
    ///
    /// Returns `OdaError::NotFound` if `key` resolves in neither tier.
    pub async fn create_toolset(&self, key: &McpKey) -> McpResult<Arc<dyn ToolsetHandle>> {
        let config = self
            .get(key)
            .await?
            .ok_or_else(|| OdaError::NotFound(global_key(key)))?;
        Ok(Arc::new(McpToolsetHandle::new(config.mcp_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oda_config::{McpServerType, MemoryConfigStore};

    fn stdio_config(app: &str, id: &str) -> McpConfig {
        McpConfig {
            mcp_id: id.to_string(),
            app_name: app.to_string(),
            name: "test".to_string(),
            description: String::new(),
            server_type: McpServerType::Stdio,
            command: Some("npx".to_string()),
            args: Vec::new(),
            url: None,
            headers: Default::default(),
            env: Default::default(),
            tool_filter: None,
            timeout: None,
            retry_count: None,
        }
    }

    fn manager() -> McpManager {
        McpManager::new(Arc::new(MemoryConfigStore::new()))
    }

    #[tokio::test]
    async fn builtin_resolves_before_custom() {
        let mgr = manager();
        mgr.register_builtin(stdio_config("app", "fs")).await.unwrap();
        let got = mgr
            .get(&("app".to_string(), "fs".to_string()))
            .await
            .unwrap();
        assert_eq!(got.unwrap().mcp_id, "fs");
    }

    #[tokio::test]
    async fn unregister_builtin_always_fails() {
        let mgr = manager();
        mgr.register_builtin(stdio_config("app", "fs")).await.unwrap();
        let err = mgr
            .unregister_builtin(&("app".to_string(), "fs".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::McpError::Core(OdaError::NotPermitted(_))));
    }

    #[tokio::test]
    async fn custom_crud_round_trips() {
        let mgr = manager();
        mgr.register_custom(stdio_config("app", "custom-fs")).await.unwrap();
        let got = mgr
            .get(&("app".to_string(), "custom-fs".to_string()))
            .await
            .unwrap();
        assert!(got.is_some());
        mgr.unregister_custom(&("app".to_string(), "custom-fs".to_string()))
            .await
            .unwrap();
        let got = mgr
            .get(&("app".to_string(), "custom-fs".to_string()))
            .await
            .unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn list_unions_both_tiers() {
        let mgr = manager();
        mgr.register_builtin(stdio_config("app", "fs")).await.unwrap();
        mgr.register_custom(stdio_config("app", "custom-fs")).await.unwrap();
        let all = mgr.list("app").await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|(k, _)| k == "app:fs"));
        assert!(all.iter().any(|(k, _)| k == "app:custom-fs"));
    }

    #[tokio::test]
    async fn create_toolset_fails_on_missing_key() {
        let mgr = manager();
        let err = mgr
            .create_toolset(&("app".to_string(), "missing".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::McpError::Core(OdaError::NotFound(_))));
    }

    #[tokio::test]
    async fn create_toolset_succeeds_on_builtin() {
        let mgr = manager();
        mgr.register_builtin(stdio_config("app", "fs")).await.unwrap();
        let handle = mgr
            .create_toolset(&("app".to_string(), "fs".to_string()))
            .await
            .unwrap();
        assert_eq!(handle.source_mcp_id(), "fs");
    }
}
