//! Shared error kinds for the OneDragon-Agent runtime.
//!
//! Crate-local error types (`oda_config::ConfigError`, `oda_mcp::McpError`,
//! `oda_runtime::RuntimeError`, ...) convert into or wrap these kinds via
//! `#[from]` rather than every crate redeclaring the same variants.

use thiserror::Error;

/// Error kinds shared across the config, registry, and runtime layers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OdaError {
    /// Lookup of an absent config or session.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate create of an existing key.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// An agent config points to a model, MCP, or tool id that does not resolve.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Mutation attempted on a reserved, built-in identifier.
    #[error("reserved id: {0}")]
    ReservedId(String),

    /// Operation not permitted on a built-in, immutable record.
    #[error("not permitted: {0}")]
    NotPermitted(String),

    /// A structural invariant was violated (e.g. stdio server without a command).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The concurrent-session cap would be exceeded.
    #[error("overloaded: {0}")]
    Overloaded(String),

    /// Operation attempted before `start()` or after `stop()`, or a double `start()`.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Result alias for operations that produce an [`OdaError`].
pub type OdaResult<T> = Result<T, OdaError>;
