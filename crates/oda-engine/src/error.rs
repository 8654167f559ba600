//! Errors raised by the engine facade.

use thiserror::Error;

/// Errors the engine facade can raise.
///
/// These are distinct from [`oda_core::OdaError`]: they describe failures of the
/// external engine itself, which callers retry around, not config/session-layer
/// outcomes.
#[derive(Debug, Error, Clone)]
pub enum EngineError {
    /// The engine raised an error before the run completed.
    #[error("engine run failed: {0}")]
    RunFailed(String),

    /// The session triple is unknown to the engine's session store.
    #[error("engine session not found: {0}")]
    SessionNotFound(String),

    /// The engine was asked to do something its implementation does not support.
    #[error("engine operation unsupported: {0}")]
    Unsupported(String),
}

/// Result alias for engine facade operations.
pub type EngineResult<T> = Result<T, EngineError>;
