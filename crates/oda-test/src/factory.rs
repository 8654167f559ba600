//! A stub [`EngineFactory`] that hands out a pre-built runner regardless of its inputs.

use std::sync::Arc;

use oda_engine::{
    ArtifactStore, EngineAgent, EngineFactory, MemoryStore, ModelDescriptor, Runner, SessionStore,
    ToolHandle, ToolsetHandle,
};

/// A marker engine-agent; carries no state of its own.
#[derive(Debug, Default)]
pub struct StubEngineAgent;

impl EngineAgent for StubEngineAgent {}

/// An [`EngineFactory`] that ignores its construction arguments and always returns the
/// same pre-configured [`Runner`].
///
/// `build_agent` is called once per `AgentFactory::create_agent`, so it must not
/// consume its runner — only `build_runner` hands back the shared instance.
pub struct StubEngineFactory {
    runner: Arc<dyn Runner>,
}

impl StubEngineFactory {
    /// Create a factory that always builds the given runner.
    #[must_use]
    pub fn new(runner: Arc<dyn Runner>) -> Self {
        Self { runner }
    }
}

impl EngineFactory for StubEngineFactory {
    fn build_agent(
        &self,
        _model: ModelDescriptor,
        _tools: Vec<Arc<dyn ToolHandle>>,
        _toolsets: Vec<Arc<dyn ToolsetHandle>>,
        _instruction: &str,
    ) -> Arc<dyn EngineAgent> {
        Arc::new(StubEngineAgent)
    }

    fn build_runner(
        &self,
        _agent: Arc<dyn EngineAgent>,
        _sessions: Arc<dyn SessionStore>,
        _artifacts: Arc<dyn ArtifactStore>,
        _memory: Arc<dyn MemoryStore>,
    ) -> Arc<dyn Runner> {
        Arc::clone(&self.runner)
    }
}
