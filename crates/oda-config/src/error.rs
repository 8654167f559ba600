//! Config-layer error type.

use oda_core::OdaError;
use thiserror::Error;

/// Errors raised by [`crate::store::ConfigStore`] implementations and the config
/// managers built on top of them.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A shared core error kind (not found, already exists, reserved id, ...).
    #[error(transparent)]
    Core(#[from] OdaError),

    /// The SQL-backed store failed to connect or query.
    #[error("storage backend error: {0}")]
    Storage(String),
}

/// Result alias for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
