//! `Session` — a per-session pool of [`RetryingExecutor`]s keyed by agent name.

use std::collections::HashMap;
use std::sync::Arc;

use oda_core::reserved::DEFAULT_AGENT_NAME;
use oda_core::SessionTriple;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::error::RuntimeResult;
use crate::executor::{RetryStream, RetryingExecutor};
use crate::factory::AgentFactory;

/// Owns the agent pool for one session triple.
///
/// All per-conversation state lives in the engine's own session service,
/// keyed by the triple; `Session` itself holds no engine state directly.
pub struct Session {
    triple: SessionTriple,
    factory: Arc<AgentFactory>,
    pool: Mutex<HashMap<String, Arc<RetryingExecutor>>>,
    last_access: Mutex<Instant>,
}

impl Session {
    /// Construct an empty session bound to `triple`.
    #[must_use]
    pub fn new(triple: SessionTriple, factory: Arc<AgentFactory>) -> Self {
        Self {
            triple,
            factory,
            pool: Mutex::new(HashMap::new()),
            last_access: Mutex::new(Instant::now()),
        }
    }

    /// The triple this session is bound to.
    #[must_use]
    pub fn triple(&self) -> &SessionTriple {
        &self.triple
    }

    /// Seconds elapsed since this session was last dispatched to.
    pub async fn idle_seconds(&self) -> u64 {
        self.last_access.lock().await.elapsed().as_secs()
    }

    /// Dispatch `message` to `agent_name` (`"default"` if omitted), lazily
    /// materializing an executor for it on pool miss.
    ///
    /// # Errors
    ///
    /// Propagates `AgentFactory::create_agent` errors on pool miss.
    pub async fn process_message(
        &self,
        message: impl Into<String>,
        agent_name: Option<&str>,
    ) -> RuntimeResult<RetryStream> {
        *self.last_access.lock().await = Instant::now();
        let agent_name = agent_name.unwrap_or(DEFAULT_AGENT_NAME);
        let executor = {
            let mut pool = self.pool.lock().await;
            if let Some(existing) = pool.get(agent_name) {
                debug!(agent_name, triple = %self.triple, "agent pool hit");
                Arc::clone(existing)
            } else {
                debug!(agent_name, triple = %self.triple, "agent pool miss, creating");
                let executor = Arc::new(
                    self.factory
                        .create_agent(agent_name, self.triple.clone())
                        .await?,
                );
                pool.insert(agent_name.to_string(), Arc::clone(&executor));
                executor
            }
        };
        Ok(executor.run_async(message.into()))
    }

    /// Dispose every executor in the pool, in unspecified but deterministic
    /// (insertion) order, and empty the pool.
    pub async fn cleanup(&self) {
        let mut pool = self.pool.lock().await;
        for (_, executor) in pool.drain() {
            executor.cancel();
        }
    }
}
