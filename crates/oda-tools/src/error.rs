//! `ToolManager` error type.

use oda_core::OdaError;
use thiserror::Error;

/// Errors raised by [`crate::ToolManager`].
#[derive(Debug, Error)]
pub enum ToolsError {
    /// A shared core error kind (duplicate registration, not found, ...).
    #[error(transparent)]
    Core(#[from] OdaError),
}

/// Result alias for tool-registry operations.
pub type ToolsResult<T> = Result<T, ToolsError>;
