//! `Context` — the root object: constructs every component in dependency
//! order and orchestrates start/stop.

use std::sync::Arc;

use oda_agents::AgentConfigManager;
use oda_config::{BootstrapModelDefaults, MemoryConfigStore, ModelConfigManager};
use oda_core::OdaError;
use oda_engine::{ArtifactStore, EngineFactory, MemoryStore, SessionStore};
use oda_mcp::McpManager;
use oda_tools::ToolManager;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::{BootstrapConfig, StorageBackend};
use crate::error::{RuntimeError, RuntimeResult};
use crate::factory::AgentFactory;
use crate::session_manager::SessionManager;

struct Components {
    tools: Arc<ToolManager>,
    mcp: Arc<McpManager>,
    models: Arc<ModelConfigManager>,
    agents: Arc<AgentConfigManager>,
    factory: Arc<AgentFactory>,
    session_manager: Arc<SessionManager>,
}

enum State {
    NotStarted,
    Started(Components),
    Stopped,
}

/// Root holder of the whole runtime. Not a singleton: tests construct their
/// own instance. Accessors return `None` before `start()` and after `stop()`.
pub struct OdaContext {
    engine: Arc<dyn EngineFactory>,
    engine_sessions: Arc<dyn SessionStore>,
    engine_artifacts: Arc<dyn ArtifactStore>,
    engine_memory: Arc<dyn MemoryStore>,
    bootstrap: BootstrapConfig,
    state: Mutex<State>,
}

impl OdaContext {
    /// Construct a context holding the engine collaborators and bootstrap
    /// config, but not yet started.
    #[must_use]
    pub fn new(
        engine: Arc<dyn EngineFactory>,
        engine_sessions: Arc<dyn SessionStore>,
        engine_artifacts: Arc<dyn ArtifactStore>,
        engine_memory: Arc<dyn MemoryStore>,
        bootstrap: BootstrapConfig,
    ) -> Self {
        Self {
            engine,
            engine_sessions,
            engine_artifacts,
            engine_memory,
            bootstrap,
            state: Mutex::new(State::NotStarted),
        }
    }

    /// Construct every component in dependency order: config stores →
    /// ToolManager → McpManager → ModelConfigManager (seeded with bootstrap
    /// defaults) → AgentConfigManager → AgentFactory → SessionManager.
    ///
    /// # Errors
    ///
    /// Returns `OdaError::InvalidState` if already started.
    pub async fn start(&self) -> RuntimeResult<()> {
        let mut state = self.state.lock().await;
        if matches!(*state, State::Started(_)) {
            return Err(OdaError::InvalidState("context already started".to_string()).into());
        }

        let model_store = self.build_store::<oda_config::ModelConfig>().await?;
        let agent_store = self.build_store::<oda_config::AgentConfig>().await?;
        let mcp_store = self.build_store::<oda_config::McpConfig>().await?;

        let tools = Arc::new(ToolManager::new());
        let mcp = Arc::new(McpManager::new(mcp_store));
        let models = Arc::new(ModelConfigManager::new(
            model_store,
            BootstrapModelDefaults {
                base_url: self.bootstrap.default_llm_base_url.clone(),
                api_key: self.bootstrap.default_llm_api_key.clone(),
                model: self.bootstrap.default_llm_model.clone(),
            },
        ));
        let agents = Arc::new(AgentConfigManager::new(
            agent_store,
            Arc::clone(&models),
            Arc::clone(&mcp),
            Arc::clone(&tools),
        ));
        let factory = Arc::new(AgentFactory::new(
            Arc::clone(&agents),
            Arc::clone(&models),
            Arc::clone(&mcp),
            Arc::clone(&tools),
            Arc::clone(&self.engine),
            Arc::clone(&self.engine_sessions),
            Arc::clone(&self.engine_artifacts),
            Arc::clone(&self.engine_memory),
        ));
        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&factory),
            Arc::clone(&self.engine_sessions),
        ));
        if let Some(cap) = self.bootstrap.max_concurrent_sessions {
            session_manager.set_concurrent_limit(Some(cap)).await;
        }

        info!("context started");
        *state = State::Started(Components {
            tools,
            mcp,
            models,
            agents,
            factory,
            session_manager,
        });
        Ok(())
    }

    /// Tear down in reverse order: drain and dispose every session, then
    /// release the manager references. Engine collaborators outlive the
    /// context (the host owns them).
    ///
    /// # Errors
    ///
    /// Returns `OdaError::InvalidState` if not currently started.
    pub async fn stop(&self) -> RuntimeResult<()> {
        let mut state = self.state.lock().await;
        match std::mem::replace(&mut *state, State::Stopped) {
            State::Started(components) => {
                components.session_manager.cleanup_inactive_sessions(0).await;
                info!("context stopped");
                Ok(())
            }
            other => {
                *state = other;
                Err(OdaError::InvalidState("context not started".to_string()).into())
            }
        }
    }

    /// The tool registry, or `None` before `start()`/after `stop()`.
    pub async fn tools(&self) -> Option<Arc<ToolManager>> {
        self.with_components(|c| Arc::clone(&c.tools)).await
    }

    /// The MCP registry, or `None` before `start()`/after `stop()`.
    pub async fn mcp(&self) -> Option<Arc<McpManager>> {
        self.with_components(|c| Arc::clone(&c.mcp)).await
    }

    /// The model config manager, or `None` before `start()`/after `stop()`.
    pub async fn models(&self) -> Option<Arc<ModelConfigManager>> {
        self.with_components(|c| Arc::clone(&c.models)).await
    }

    /// The agent config manager, or `None` before `start()`/after `stop()`.
    pub async fn agents(&self) -> Option<Arc<AgentConfigManager>> {
        self.with_components(|c| Arc::clone(&c.agents)).await
    }

    /// The agent factory, or `None` before `start()`/after `stop()`.
    pub async fn factory(&self) -> Option<Arc<AgentFactory>> {
        self.with_components(|c| Arc::clone(&c.factory)).await
    }

    /// The session manager, or `None` before `start()`/after `stop()`.
    pub async fn session_manager(&self) -> Option<Arc<SessionManager>> {
        self.with_components(|c| Arc::clone(&c.session_manager)).await
    }

    async fn with_components<T>(&self, f: impl FnOnce(&Components) -> T) -> Option<T> {
        match &*self.state.lock().await {
            State::Started(components) => Some(f(components)),
            State::NotStarted | State::Stopped => None,
        }
    }

    #[cfg(not(feature = "sql"))]
    async fn build_store<T>(&self) -> RuntimeResult<Arc<dyn oda_config::ConfigStore<T>>>
    where
        T: oda_config::Keyed + Clone + Send + Sync + 'static,
    {
        if self.bootstrap.storage == StorageBackend::Sql {
            return Err(RuntimeError::Core(OdaError::InvalidState(
                "storage = sql requires the sql feature".to_string(),
            )));
        }
        Ok(Arc::new(MemoryConfigStore::new()))
    }

    #[cfg(feature = "sql")]
    async fn build_store<T>(&self) -> RuntimeResult<Arc<dyn oda_config::ConfigStore<T>>>
    where
        T: oda_config::ConfigRecord,
    {
        match self.bootstrap.storage {
            StorageBackend::Memory => Ok(Arc::new(MemoryConfigStore::new())),
            StorageBackend::Sql => {
                let store = match &self.bootstrap.sql_path {
                    Some(path) => oda_config::SqlConfigStore::connect_embedded(path).await,
                    None => oda_config::SqlConfigStore::connect_memory().await,
                }
                .map_err(|e| RuntimeError::Core(OdaError::InvalidState(e.to_string())))?;
                Ok(Arc::new(store))
            }
        }
    }
}
