//! The engine facade: the thin, trait-based boundary between the core and the
//! external LLM agent/runner engine.
//!
//! The core never depends on a concrete engine — only on these traits, the way
//! the teacher crate's `AgentRuntime<P>` is generic over `P: LlmProvider` rather
//! than a concrete provider.

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::Stream;
use oda_core::SessionTriple;
use serde_json::Value;

use crate::error::EngineResult;
use crate::event::Event;

/// A boxed, `Send` stream of engine events, each of which may itself be an error.
pub type EventStream = Pin<Box<dyn Stream<Item = EngineResult<Event>> + Send>>;

/// The engine's session bookkeeping: append-only event history keyed by triple.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a new engine-side session record, optionally seeded with state.
    async fn create(&self, triple: &SessionTriple, initial_state: Option<Value>) -> EngineResult<()>;

    /// Whether the engine knows about this triple.
    async fn get(&self, triple: &SessionTriple) -> EngineResult<Option<Value>>;

    /// Delete the engine-side session record.
    async fn delete(&self, triple: &SessionTriple) -> EngineResult<()>;

    /// List all triples known to the engine for `(app_name, user_id)`.
    async fn list(&self, app_name: &str, user_id: &str) -> EngineResult<Vec<SessionTriple>>;

    /// Append an event to the session's history.
    async fn append_event(&self, triple: &SessionTriple, event: Event) -> EngineResult<()>;
}

/// Opaque artifact storage, passed through to runner construction unexamined.
pub trait ArtifactStore: Send + Sync {}

/// Opaque long-term memory storage, passed through to runner construction unexamined.
pub trait MemoryStore: Send + Sync {}

/// An opaque, engine-compatible tool handle.
///
/// `ToolManager` stores these; the engine invokes them during a run.
#[async_trait]
pub trait ToolHandle: Send + Sync {
    /// The tool's identifier, for diagnostics only — not necessarily globally unique.
    fn name(&self) -> &str;

    /// Invoke the tool with the given JSON arguments.
    async fn invoke(&self, args: Value) -> EngineResult<Value>;
}

/// An opaque handle to a bundle of tools materialized from one MCP config.
pub trait ToolsetHandle: Send + Sync {
    /// The MCP config id this toolset was produced from, for diagnostics only.
    fn source_mcp_id(&self) -> &str;
}

/// Which model an agent should run against, resolved from a `ModelConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    /// Provider base URL.
    pub base_url: String,
    /// Provider API key.
    pub api_key: String,
    /// Model name/identifier.
    pub model: String,
}

/// A constructed, engine-owned agent instance bound to a model, tools, and instruction.
pub trait EngineAgent: Send + Sync {}

/// A constructed, engine-owned runner bound to one agent and the session/artifact/memory
/// services.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Run the bound agent against `(app_name, user_id, session_id)`.
    ///
    /// `new_message` is the user's message on the first attempt, and is `None` on
    /// every retry attempt afterward — the engine is expected to resume from the
    /// session history it already appended the message to.
    async fn run_async(
        &self,
        triple: &SessionTriple,
        new_message: Option<&str>,
    ) -> EngineResult<EventStream>;
}

/// Factory the core calls to materialize engine-owned agents and runners.
///
/// This is the construction entry point `AgentFactory` (C6) uses in step 5 of
/// `create_agent`: build an `EngineAgent` from the resolved model/tools/toolsets,
/// then build a `Runner` bound to that agent and the session/artifact/memory services.
pub trait EngineFactory: Send + Sync {
    /// Build an agent instance bound to the resolved model, tools, and instruction.
    fn build_agent(
        &self,
        model: ModelDescriptor,
        tools: Vec<Arc<dyn ToolHandle>>,
        toolsets: Vec<Arc<dyn ToolsetHandle>>,
        instruction: &str,
    ) -> Arc<dyn EngineAgent>;

    /// Build a runner bound to the given agent and session/artifact/memory services.
    fn build_runner(
        &self,
        agent: Arc<dyn EngineAgent>,
        sessions: Arc<dyn SessionStore>,
        artifacts: Arc<dyn ArtifactStore>,
        memory: Arc<dyn MemoryStore>,
    ) -> Arc<dyn Runner>;
}
