//! `AgentFactory` — materializes a [`crate::RetryingExecutor`] for `(agent_name, triple)`.

use std::sync::Arc;

use oda_agents::AgentConfigManager;
use oda_config::ModelConfigManager;
use oda_core::{OdaError, SessionTriple};
use oda_engine::{ArtifactStore, EngineFactory, MemoryStore, ModelDescriptor, SessionStore};
use oda_mcp::McpManager;
use oda_tools::ToolManager;
use tracing::info;

use crate::error::RuntimeResult;
use crate::executor::RetryingExecutor;

/// Default retry budget for executors this factory produces.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Materializes engine agents/runners from config and wraps them in a
/// [`RetryingExecutor`] bound to one session triple.
///
/// Stateless beyond its held service references: every call produces a fresh
/// executor with its own engine-side state handle.
pub struct AgentFactory {
    agents: Arc<AgentConfigManager>,
    models: Arc<ModelConfigManager>,
    mcp: Arc<McpManager>,
    tools: Arc<ToolManager>,
    engine: Arc<dyn EngineFactory>,
    sessions: Arc<dyn SessionStore>,
    artifacts: Arc<dyn ArtifactStore>,
    memory: Arc<dyn MemoryStore>,
    max_retries: u32,
}

impl AgentFactory {
    /// Construct the factory from its service dependencies.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        agents: Arc<AgentConfigManager>,
        models: Arc<ModelConfigManager>,
        mcp: Arc<McpManager>,
        tools: Arc<ToolManager>,
        engine: Arc<dyn EngineFactory>,
        sessions: Arc<dyn SessionStore>,
        artifacts: Arc<dyn ArtifactStore>,
        memory: Arc<dyn MemoryStore>,
    ) -> Self {
        Self {
            agents,
            models,
            mcp,
            tools,
            engine,
            sessions,
            artifacts,
            memory,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the default retry budget for executors this factory produces.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Materialize a [`RetryingExecutor`] for `agent_name` bound to `triple`.
    ///
    /// # Errors
    ///
    /// Returns `OdaError::NotFound` if `agent_name` does not resolve,
    /// `OdaError::InvalidReference` if the agent's model or any `mcp_id`/`tool_id`
    /// does not resolve.
    pub async fn create_agent(
        &self,
        agent_name: &str,
        triple: SessionTriple,
    ) -> RuntimeResult<RetryingExecutor> {
        let config = self
            .agents
            .get(&triple.app_name, agent_name)
            .await?
            .ok_or_else(|| OdaError::NotFound(agent_name.to_string()))?;

        let model = self
            .models
            .get(&triple.app_name, &config.model_config_id)
            .await?
            .ok_or_else(|| {
                OdaError::InvalidReference(format!(
                    "model_config_id {} not found",
                    config.model_config_id
                ))
            })?;

        let mut toolsets = Vec::with_capacity(config.mcp_ids.len());
        for mcp_id in &config.mcp_ids {
            let key = (triple.app_name.clone(), mcp_id.clone());
            toolsets.push(self.mcp.create_toolset(&key).await?);
        }

        let mut tool_handles = Vec::with_capacity(config.tool_ids.len());
        for tool_id in &config.tool_ids {
            let handle = self
                .tools
                .get(&triple.app_name, tool_id)
                .await
                .ok_or_else(|| OdaError::InvalidReference(format!("tool_id {tool_id} not found")))?;
            tool_handles.push(handle);
        }

        let descriptor = ModelDescriptor {
            base_url: model.base_url,
            api_key: model.api_key,
            model: model.model,
        };

        let engine_agent = self
            .engine
            .build_agent(descriptor, tool_handles, toolsets, &config.instruction);
        let runner = self.engine.build_runner(
            engine_agent,
            Arc::clone(&self.sessions),
            Arc::clone(&self.artifacts),
            Arc::clone(&self.memory),
        );

        info!(agent_name, app_name = %triple.app_name, "materialized agent executor");
        Ok(RetryingExecutor::new(triple, runner, self.max_retries))
    }
}
