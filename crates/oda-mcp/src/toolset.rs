//! The opaque tool-set handle produced from one MCP config.

use oda_engine::ToolsetHandle;

/// A handle the engine materializes into the tools exposed by one MCP server.
///
/// `McpManager` never caches these: each call to
/// [`crate::McpManager::create_toolset`] returns a fresh one.
pub struct McpToolsetHandle {
    mcp_id: String,
}

impl McpToolsetHandle {
    /// Build a handle sourced from `mcp_id`.
    #[must_use]
    pub fn new(mcp_id: impl Into<String>) -> Self {
        Self { mcp_id: mcp_id.into() }
    }
}

impl ToolsetHandle for McpToolsetHandle {
    fn source_mcp_id(&self) -> &str {
        &self.mcp_id
    }
}
