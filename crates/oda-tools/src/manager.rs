//! `ToolManager` — flat registry of tool handles keyed by `(app_name, tool_id)`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use oda_core::OdaError;
use oda_engine::{EngineResult, ToolHandle};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::ToolsResult;
use crate::function::FunctionTool;

/// The key a handle is registered and looked up under.
pub type ToolKey = (String, String);

/// Registry mapping `(app_name, tool_id)` to engine-compatible tool handles.
///
/// Does not own tool lifetimes beyond the registry entry itself: cleanup of
/// resources a tool holds open is the owning Session's responsibility.
pub struct ToolManager {
    handles: RwLock<HashMap<ToolKey, Arc<dyn ToolHandle>>>,
}

impl ToolManager {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handles: RwLock::new(HashMap::new()),
        }
    }

    /// The fully-qualified identifier `"app_name:tool_id"` for a key.
    #[must_use]
    pub fn global_id(app_name: &str, tool_id: &str) -> String {
        format!("{app_name}:{tool_id}")
    }

    /// Register a pre-built handle.
    ///
    /// # Errors
    ///
    /// Returns `OdaError::AlreadyExists` if `(app_name, tool_id)` is already registered.
    pub async fn register_tool(
        &self,
        app_name: &str,
        tool_id: &str,
        handle: Arc<dyn ToolHandle>,
    ) -> ToolsResult<()> {
        let key = (app_name.to_string(), tool_id.to_string());
        let mut handles = self.handles.write().await;
        if handles.contains_key(&key) {
            return Err(OdaError::AlreadyExists(Self::global_id(app_name, tool_id)).into());
        }
        debug!(app_name, tool_id, "registered tool");
        handles.insert(key, handle);
        Ok(())
    }

    /// Wrap `f` (synchronous or asynchronous) into a [`FunctionTool`] named
    /// `tool_id` and register it, same error behavior as [`Self::register_tool`].
    ///
    /// # Errors
    ///
    /// Returns `OdaError::AlreadyExists` if `(app_name, tool_id)` is already registered.
    pub async fn register_function<F, Fut>(
        &self,
        app_name: &str,
        tool_id: &str,
        f: F,
    ) -> ToolsResult<()>
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = EngineResult<Value>> + Send + 'static,
    {
        self.register_tool(app_name, tool_id, Arc::new(FunctionTool::new(tool_id, f)))
            .await
    }

    /// Look up a handle by key.
    pub async fn get(&self, app_name: &str, tool_id: &str) -> Option<Arc<dyn ToolHandle>> {
        self.handles
            .read()
            .await
            .get(&(app_name.to_string(), tool_id.to_string()))
            .cloned()
    }

    /// List every handle registered for `app_name`, or every handle if `app_name` is `None`.
    pub async fn list(&self, app_name: Option<&str>) -> Vec<(ToolKey, Arc<dyn ToolHandle>)> {
        self.handles
            .read()
            .await
            .iter()
            .filter(|((app, _), _)| app_name.is_none_or(|a| a == app))
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect()
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}
