//! Config record types: `ModelConfig`, `AgentConfig`, `McpConfig`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A model backend binding: provider base URL, API key, and model name.
///
/// `model_id = "__default_llm_config"` is reserved for the bootstrap-derived
/// built-in default (see [`oda_core::reserved::DEFAULT_MODEL_CONFIG_ID`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Application namespace this config belongs to.
    pub app_name: String,
    /// Identifier, unique within `app_name`.
    pub model_id: String,
    /// Provider base URL.
    pub base_url: String,
    /// Provider API key.
    pub api_key: String,
    /// Model name/identifier understood by the provider.
    pub model: String,
}

/// An agent's wiring: model, tools, MCP servers, and sub-agents.
///
/// `agent_name = "default"` is reserved for the built-in agent config (see
/// [`oda_core::reserved::DEFAULT_AGENT_NAME`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Application namespace this config belongs to.
    pub app_name: String,
    /// Identifier, unique within `app_name`.
    pub agent_name: String,
    /// Engine-level agent type/kind (opaque to this crate).
    pub agent_type: String,
    /// Human-readable description.
    pub description: String,
    /// System instruction given to the agent.
    pub instruction: String,
    /// The `ModelConfig.model_id` this agent resolves at creation time.
    pub model_config_id: String,
    /// `ToolManager` tool ids this agent wires in, in order.
    #[serde(default)]
    pub tool_ids: Vec<String>,
    /// `McpManager` mcp ids this agent wires in, in order.
    #[serde(default)]
    pub mcp_ids: Vec<String>,
    /// Sub-agent names this agent may delegate to, in order.
    #[serde(default)]
    pub sub_agent_names: Vec<String>,
}

/// MCP transport kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McpServerType {
    /// Standard I/O (spawn a child process).
    Stdio,
    /// Server-Sent Events (HTTP streaming).
    Sse,
    /// Plain HTTP.
    Http,
}

/// An MCP server definition.
///
/// Structural invariant: `server_type = Stdio` requires `command`; `Sse`/`Http`
/// require `url`. Enforced by [`crate::validate::validate_mcp_config`], not by
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpConfig {
    /// Identifier, unique within `(app_name, tier)`.
    pub mcp_id: String,
    /// Application namespace this config belongs to.
    pub app_name: String,
    /// Human-readable name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Transport kind.
    pub server_type: McpServerType,
    /// Command to spawn, required for `Stdio`.
    #[serde(default)]
    pub command: Option<String>,
    /// Command arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Server URL, required for `Sse`/`Http`.
    #[serde(default)]
    pub url: Option<String>,
    /// HTTP headers for `Sse`/`Http` transports.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Environment variables for `Stdio` transport.
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Restrict which tools are exposed from this server, if set.
    #[serde(default)]
    pub tool_filter: Option<Vec<String>>,
    /// Per-call timeout in seconds; an engine-layer concern, passed through.
    #[serde(default)]
    pub timeout: Option<u64>,
    /// Retry count; an engine-layer concern, passed through.
    #[serde(default)]
    pub retry_count: Option<u32>,
}

/// The key a [`crate::store::ConfigStore`] indexes records by: `(app_name, inner_id)`.
pub type StoreKey = (String, String);

/// Key for looking up an `McpConfig`: `(app_name, mcp_id)`.
pub type McpKey = (String, String);
