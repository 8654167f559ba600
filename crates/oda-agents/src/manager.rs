//! `AgentConfigManager` — CRUD for agent configs with reference validation.

use std::sync::Arc;

use oda_config::{AgentConfig, ConfigStore, ModelConfigManager};
use oda_core::reserved::{is_reserved_agent_name, DEFAULT_AGENT_NAME, DEFAULT_MODEL_CONFIG_ID};
use oda_core::OdaError;
use oda_mcp::McpManager;
use oda_tools::ToolManager;
use tracing::{debug, info};

use crate::error::{AgentsError, AgentsResult};

/// CRUD manager for [`AgentConfig`] records, with one cached built-in
/// `"default"` agent and reference validation on every write.
pub struct AgentConfigManager {
    store: Arc<dyn ConfigStore<AgentConfig>>,
    models: Arc<ModelConfigManager>,
    mcp: Arc<McpManager>,
    tools: Arc<ToolManager>,
    default: AgentConfig,
}

impl AgentConfigManager {
    /// Construct the manager. The built-in `"default"` agent is synthesized
    /// with no tools, no MCP servers, and no sub-agents, bound to the reserved
    /// default model id.
    #[must_use]
    pub fn new(
        store: Arc<dyn ConfigStore<AgentConfig>>,
        models: Arc<ModelConfigManager>,
        mcp: Arc<McpManager>,
        tools: Arc<ToolManager>,
    ) -> Self {
        let default = AgentConfig {
            app_name: String::new(),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            agent_type: "default".to_string(),
            description: "Built-in default agent".to_string(),
            instruction: String::new(),
            model_config_id: DEFAULT_MODEL_CONFIG_ID.to_string(),
            tool_ids: Vec::new(),
            mcp_ids: Vec::new(),
            sub_agent_names: Vec::new(),
        };
        Self {
            store,
            models,
            mcp,
            tools,
            default,
        }
    }

    async fn validate_references(&self, c: &AgentConfig) -> AgentsResult<()> {
        if !self.models.validate(&c.app_name, &c.model_config_id).await? {
            return Err(OdaError::InvalidReference(format!(
                "model_config_id {} not found",
                c.model_config_id
            ))
            .into());
        }
        for mcp_id in &c.mcp_ids {
            let key = (c.app_name.clone(), mcp_id.clone());
            if self.mcp.get(&key).await?.is_none() {
                return Err(
                    OdaError::InvalidReference(format!("mcp_id {mcp_id} not found")).into(),
                );
            }
        }
        for tool_id in &c.tool_ids {
            if self.tools.get(&c.app_name, tool_id).await.is_none() {
                return Err(
                    OdaError::InvalidReference(format!("tool_id {tool_id} not found")).into(),
                );
            }
        }
        Ok(())
    }

    /// Create a new agent config after validating its references.
    ///
    /// # Errors
    ///
    /// Returns `OdaError::ReservedId` for `"default"`, `OdaError::InvalidReference`
    /// if any referenced model/MCP/tool id does not resolve, or propagates the
    /// store's result.
    pub async fn create(&self, c: AgentConfig) -> AgentsResult<()> {
        if is_reserved_agent_name(&c.agent_name) {
            return Err(OdaError::ReservedId(c.agent_name).into());
        }
        self.validate_references(&c).await?;
        self.store.create(c).await.map_err(AgentsError::from)
    }

    /// Replace an existing agent config after validating its references.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`], plus `OdaError::NotFound` if the config does
    /// not already exist.
    pub async fn update(&self, c: AgentConfig) -> AgentsResult<()> {
        if is_reserved_agent_name(&c.agent_name) {
            return Err(OdaError::ReservedId(c.agent_name).into());
        }
        self.validate_references(&c).await?;
        self.store.update(c).await.map_err(AgentsError::from)
    }

    /// Look up an agent config, consulting the built-in cache for `"default"`.
    pub async fn get(&self, app_name: &str, agent_name: &str) -> AgentsResult<Option<AgentConfig>> {
        if is_reserved_agent_name(agent_name) {
            debug!(agent_name, "resolved reserved default agent config from cache");
            let mut default = self.default.clone();
            default.app_name = app_name.to_string();
            return Ok(Some(default));
        }
        Ok(self
            .store
            .get(&(app_name.to_string(), agent_name.to_string()))
            .await?)
    }

    /// Delete an agent config by name.
    ///
    /// # Errors
    ///
    /// Returns `OdaError::ReservedId` if `agent_name` is `"default"`.
    pub async fn delete(&self, app_name: &str, agent_name: &str) -> AgentsResult<()> {
        if is_reserved_agent_name(agent_name) {
            return Err(OdaError::ReservedId(agent_name.to_string()).into());
        }
        self.store
            .delete(&(app_name.to_string(), agent_name.to_string()))
            .await?;
        info!(app_name, agent_name, "deleted agent config");
        Ok(())
    }

    /// List every stored agent config. The built-in `"default"` is not included;
    /// it is only surfaced via [`Self::get`].
    pub async fn list(&self) -> AgentsResult<Vec<AgentConfig>> {
        Ok(self.store.list().await?)
    }

    /// `true` iff `agent_name` is the reserved built-in name.
    #[must_use]
    pub fn is_builtin(agent_name: &str) -> bool {
        is_reserved_agent_name(agent_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oda_config::{BootstrapModelDefaults, MemoryConfigStore, ModelConfig};

    fn model(app: &str, id: &str) -> ModelConfig {
        ModelConfig {
            app_name: app.to_string(),
            model_id: id.to_string(),
            base_url: "https://example.com".to_string(),
            api_key: "key".to_string(),
            model: "gpt".to_string(),
        }
    }

    fn agent(app: &str, name: &str, model_id: &str) -> AgentConfig {
        AgentConfig {
            app_name: app.to_string(),
            agent_name: name.to_string(),
            agent_type: "general".to_string(),
            description: String::new(),
            instruction: String::new(),
            model_config_id: model_id.to_string(),
            tool_ids: Vec::new(),
            mcp_ids: Vec::new(),
            sub_agent_names: Vec::new(),
        }
    }

    async fn manager() -> (AgentConfigManager, Arc<ModelConfigManager>) {
        let models = Arc::new(ModelConfigManager::new(
            Arc::new(MemoryConfigStore::new()),
            BootstrapModelDefaults::default(),
        ));
        let mcp = Arc::new(McpManager::new(Arc::new(MemoryConfigStore::new())));
        let tools = Arc::new(ToolManager::new());
        let mgr = AgentConfigManager::new(Arc::new(MemoryConfigStore::new()), Arc::clone(&models), mcp, tools);
        (mgr, models)
    }

    #[tokio::test]
    async fn default_agent_resolves_without_store() {
        let (mgr, _models) = manager().await;
        let got = mgr.get("app", DEFAULT_AGENT_NAME).await.unwrap();
        assert_eq!(got.unwrap().model_config_id, DEFAULT_MODEL_CONFIG_ID);
    }

    #[tokio::test]
    async fn create_rejects_reserved_name() {
        let (mgr, _models) = manager().await;
        let err = mgr
            .create(agent("app", DEFAULT_AGENT_NAME, DEFAULT_MODEL_CONFIG_ID))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentsError::Core(OdaError::ReservedId(_))));
    }

    #[tokio::test]
    async fn create_rejects_missing_model_reference() {
        let (mgr, _models) = manager().await;
        let err = mgr.create(agent("app", "researcher", "missing")).await.unwrap_err();
        assert!(matches!(err, AgentsError::Core(OdaError::InvalidReference(_))));
    }

    #[tokio::test]
    async fn create_succeeds_with_valid_reference() {
        let (mgr, models) = manager().await;
        models.create(model("app", "m1")).await.unwrap();
        mgr.create(agent("app", "researcher", "m1")).await.unwrap();
        let got = mgr.get("app", "researcher").await.unwrap();
        assert!(got.is_some());
    }

    #[tokio::test]
    async fn list_excludes_builtin() {
        let (mgr, models) = manager().await;
        models.create(model("app", "m1")).await.unwrap();
        mgr.create(agent("app", "researcher", "m1")).await.unwrap();
        let all = mgr.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].agent_name, "researcher");
    }

    #[test]
    fn is_builtin_checks_reserved_name() {
        assert!(AgentConfigManager::is_builtin(DEFAULT_AGENT_NAME));
        assert!(!AgentConfigManager::is_builtin("researcher"));
    }
}
