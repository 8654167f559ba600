//! `McpManager` error type.

use oda_core::OdaError;
use thiserror::Error;

/// Errors raised by [`crate::McpManager`].
#[derive(Debug, Error)]
pub enum McpError {
    /// A shared core error kind (reserved id, not permitted, validation, ...).
    #[error(transparent)]
    Core(#[from] OdaError),

    /// The backing custom-tier config store failed.
    #[error(transparent)]
    Config(#[from] oda_config::ConfigError),
}

/// Result alias for MCP registry operations.
pub type McpResult<T> = Result<T, McpError>;
