//! CRUD registry for agent configs, validating model/MCP/tool references on
//! every write.

#![warn(missing_docs)]

pub mod error;
pub mod manager;

pub use error::{AgentsError, AgentsResult};
pub use manager::AgentConfigManager;
