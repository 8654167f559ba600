//! `SessionManager` — the global set of [`Session`]s, with a concurrency cap
//! and idle reaping.

use std::collections::HashMap;
use std::sync::Arc;

use oda_core::{OdaError, SessionTriple};
use oda_engine::SessionStore;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::error::RuntimeResult;
use crate::factory::AgentFactory;
use crate::session::Session;

/// Owns every live [`Session`], enforcing an optional concurrency cap and
/// providing cooperative idle reaping.
pub struct SessionManager {
    factory: Arc<AgentFactory>,
    engine_sessions: Arc<dyn SessionStore>,
    sessions: Mutex<HashMap<SessionTriple, Arc<Session>>>,
    max_concurrent_sessions: Mutex<Option<usize>>,
}

impl SessionManager {
    /// Construct an empty manager with no concurrency cap.
    #[must_use]
    pub fn new(factory: Arc<AgentFactory>, engine_sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            factory,
            engine_sessions,
            sessions: Mutex::new(HashMap::new()),
            max_concurrent_sessions: Mutex::new(None),
        }
    }

    /// Create a session for `(app_name, user_id, session_id)`, generating
    /// `session_id` if omitted. Idempotent: an existing triple returns the
    /// existing session rather than erroring.
    ///
    /// # Errors
    ///
    /// Returns `OdaError::Overloaded` if the concurrency cap is set and would
    /// be exceeded by a genuinely new triple.
    pub async fn create_session(
        &self,
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: Option<String>,
    ) -> RuntimeResult<Arc<Session>> {
        let triple = SessionTriple::new(app_name, user_id, session_id);
        let mut sessions = self.sessions.lock().await;
        if let Some(existing) = sessions.get(&triple) {
            return Ok(Arc::clone(existing));
        }

        let cap = *self.max_concurrent_sessions.lock().await;
        if let Some(cap) = cap {
            if sessions.len() >= cap {
                return Err(OdaError::Overloaded(format!(
                    "concurrent session cap {cap} reached"
                ))
                .into());
            }
        }

        self.engine_sessions.create(&triple, None).await?;
        let session = Arc::new(Session::new(triple.clone(), Arc::clone(&self.factory)));
        sessions.insert(triple.clone(), Arc::clone(&session));
        info!(triple = %triple, "created session");
        Ok(session)
    }

    /// Look up a session. On pool miss, consult the engine's session store:
    /// if the engine knows the triple, materialize a wrapper for it; else
    /// return `None`.
    ///
    /// # Errors
    ///
    /// Propagates engine session-store lookup errors.
    pub async fn get_session(&self, triple: &SessionTriple) -> RuntimeResult<Option<Arc<Session>>> {
        let mut sessions = self.sessions.lock().await;
        if let Some(existing) = sessions.get(triple) {
            return Ok(Some(Arc::clone(existing)));
        }
        if self.engine_sessions.get(triple).await?.is_some() {
            let session = Arc::new(Session::new(triple.clone(), Arc::clone(&self.factory)));
            sessions.insert(triple.clone(), Arc::clone(&session));
            return Ok(Some(session));
        }
        Ok(None)
    }

    /// List every session whose `(app_name, user_id)` prefix matches.
    pub async fn list_sessions(&self, app_name: &str, user_id: &str) -> Vec<Arc<Session>> {
        self.sessions
            .lock()
            .await
            .iter()
            .filter(|(triple, _)| triple.matches_prefix(app_name, user_id))
            .map(|(_, session)| Arc::clone(session))
            .collect()
    }

    /// Remove `triple` from the pool, clean up its executors, then instruct
    /// the engine to delete its session record. Idempotent.
    ///
    /// # Errors
    ///
    /// Propagates engine session-store deletion errors.
    pub async fn delete_session(&self, triple: &SessionTriple) -> RuntimeResult<()> {
        let removed = self.sessions.lock().await.remove(triple);
        if let Some(session) = removed {
            session.cleanup().await;
        }
        self.engine_sessions.delete(triple).await?;
        info!(triple = %triple, "deleted session");
        Ok(())
    }

    /// Delete every session whose idle time exceeds `timeout_s`.
    ///
    /// Cooperative: invoked by the host, never automatic. Each session's own
    /// cleanup runs before it is removed from the pool, so an actively
    /// executing session is never interleaved with reaping.
    pub async fn cleanup_inactive_sessions(&self, timeout_s: u64) {
        let candidates: Vec<(SessionTriple, Arc<Session>)> = self
            .sessions
            .lock()
            .await
            .iter()
            .map(|(triple, session)| (triple.clone(), Arc::clone(session)))
            .collect();

        for (triple, session) in candidates {
            if session.idle_seconds().await >= timeout_s {
                if let Err(e) = self.delete_session(&triple).await {
                    error!(triple = %triple, error = %e, "failed to reap inactive session");
                }
            }
        }
    }

    /// Update the concurrency cap. Does not retroactively evict sessions
    /// already over the new limit.
    pub async fn set_concurrent_limit(&self, n: Option<usize>) {
        *self.max_concurrent_sessions.lock().await = n;
    }
}
