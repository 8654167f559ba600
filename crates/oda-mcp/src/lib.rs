//! CRUD registry for MCP server configs, split into built-in (immutable) and
//! custom (persisted, mutable) tiers, plus a factory for tool-set handles.

#![warn(missing_docs)]

pub mod error;
pub mod registry;
pub mod toolset;

pub use error::{McpError, McpResult};
pub use registry::McpManager;
pub use toolset::McpToolsetHandle;
