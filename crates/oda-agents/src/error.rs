//! `AgentConfigManager` error type.

use oda_core::OdaError;
use thiserror::Error;

/// Errors raised by [`crate::AgentConfigManager`].
#[derive(Debug, Error)]
pub enum AgentsError {
    /// A shared core error kind (reserved id, invalid reference, ...).
    #[error(transparent)]
    Core(#[from] OdaError),

    /// The backing config store failed.
    #[error(transparent)]
    Config(#[from] oda_config::ConfigError),

    /// The MCP registry failed while validating an `mcp_id` reference.
    #[error(transparent)]
    Mcp(#[from] oda_mcp::McpError),
}

/// Result alias for agent-config operations.
pub type AgentsResult<T> = Result<T, AgentsError>;
