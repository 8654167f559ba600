//! Reserved identifiers.
//!
//! Every mutation path in the config managers checks these constants explicitly
//! rather than relying on a storage layer to enforce immutability.

/// Reserved `model_id` for the bootstrap-derived default model config.
pub const DEFAULT_MODEL_CONFIG_ID: &str = "__default_llm_config";

/// Synthetic `app_name` the default model config is cached under.
pub const DEFAULT_MODEL_APP_NAME: &str = "__default_app";

/// Reserved `agent_name` for the built-in agent config.
pub const DEFAULT_AGENT_NAME: &str = "default";

/// Whether `model_id` is the reserved default model id.
#[must_use]
pub fn is_reserved_model_id(model_id: &str) -> bool {
    model_id == DEFAULT_MODEL_CONFIG_ID
}

/// Whether `agent_name` is the reserved default agent name.
#[must_use]
pub fn is_reserved_agent_name(agent_name: &str) -> bool {
    agent_name == DEFAULT_AGENT_NAME
}
