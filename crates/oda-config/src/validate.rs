//! Structural validation for config records.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{McpConfig, McpServerType};
use oda_core::OdaError;

/// Validate the server-type/parameter invariants on an `McpConfig`.
///
/// `Stdio` requires `command`; `Sse` and `Http` require `url`.
///
/// # Errors
///
/// Returns [`ConfigError::Core`] wrapping [`OdaError::ValidationError`] if the
/// required field for the transport is missing.
pub fn validate_mcp_config(config: &McpConfig) -> ConfigResult<()> {
    match config.server_type {
        McpServerType::Stdio if config.command.is_none() => Err(ConfigError::Core(
            OdaError::ValidationError(format!(
                "mcp config '{}' has server_type=stdio but no command",
                config.mcp_id
            )),
        )),
        McpServerType::Sse | McpServerType::Http if config.url.is_none() => Err(
            ConfigError::Core(OdaError::ValidationError(format!(
                "mcp config '{}' has server_type={:?} but no url",
                config.mcp_id, config.server_type
            ))),
        ),
        _ => Ok(()),
    }
}
