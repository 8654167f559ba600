//! Runtime-layer error type: `AgentFactory`, `Session`, `SessionManager`, `Context`.

use oda_core::OdaError;
use thiserror::Error;

/// Errors raised by the runtime layer.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A shared core error kind (not found, overloaded, invalid state, ...).
    #[error(transparent)]
    Core(#[from] OdaError),

    /// The engine facade raised an error outside the retry protocol (e.g. during
    /// agent/runner construction, before any `run_async` attempt starts).
    #[error(transparent)]
    Engine(#[from] oda_engine::EngineError),

    /// An agent-config lookup or validation failed.
    #[error(transparent)]
    Agents(#[from] oda_agents::AgentsError),

    /// An MCP tool-set resolution failed.
    #[error(transparent)]
    Mcp(#[from] oda_mcp::McpError),
}

/// Result alias for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
