//! OneDragon-Agent Engine facade — the thin interfaces the core consumes from the
//! external LLM agent/runner engine (Google ADK in the original system, treated here
//! as an opaque collaborator behind traits).
//!
//! Nothing in this crate implements an LLM, an MCP transport, or persistence — it
//! only declares the boundary. See `oda-test` for an in-memory stub implementation
//! used by the runtime's own test suite.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod error;
pub mod event;
pub mod traits;

pub use error::{EngineError, EngineResult};
pub use event::{Actions, Content, Event, Part, ERROR_CODE_MAX_RETRIES_EXCEEDED, ERROR_CODE_RETRY_ATTEMPT};
pub use traits::{
    ArtifactStore, EngineAgent, EngineFactory, EventStream, MemoryStore, ModelDescriptor, Runner,
    SessionStore, ToolHandle, ToolsetHandle,
};
