//! An in-memory [`SessionStore`] for exercising the runtime without a real engine.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use oda_core::SessionTriple;
use oda_engine::{Event, EngineResult, SessionStore};
use serde_json::Value;

/// A session record: initial state plus the appended event history.
#[derive(Debug, Clone, Default)]
struct Record {
    state: Option<Value>,
    events: Vec<Event>,
}

/// In-memory, `HashMap`-backed [`SessionStore`].
#[derive(Default)]
pub struct StubSessionStore {
    records: Mutex<HashMap<SessionTriple, Record>>,
}

impl StubSessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the events appended for `triple`, or an empty vec if unknown.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn events_for(&self, triple: &SessionTriple) -> Vec<Event> {
        self.records
            .lock()
            .expect("lock poisoned")
            .get(triple)
            .map(|r| r.events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SessionStore for StubSessionStore {
    async fn create(&self, triple: &SessionTriple, initial_state: Option<Value>) -> EngineResult<()> {
        let mut records = self.records.lock().expect("lock poisoned");
        records.entry(triple.clone()).or_insert_with(|| Record {
            state: initial_state,
            events: Vec::new(),
        });
        Ok(())
    }

    async fn get(&self, triple: &SessionTriple) -> EngineResult<Option<Value>> {
        Ok(self
            .records
            .lock()
            .expect("lock poisoned")
            .get(triple)
            .map(|r| r.state.clone().unwrap_or(Value::Null)))
    }

    async fn delete(&self, triple: &SessionTriple) -> EngineResult<()> {
        self.records.lock().expect("lock poisoned").remove(triple);
        Ok(())
    }

    async fn list(&self, app_name: &str, user_id: &str) -> EngineResult<Vec<SessionTriple>> {
        Ok(self
            .records
            .lock()
            .expect("lock poisoned")
            .keys()
            .filter(|t| t.matches_prefix(app_name, user_id))
            .cloned()
            .collect())
    }

    async fn append_event(&self, triple: &SessionTriple, event: Event) -> EngineResult<()> {
        let mut records = self.records.lock().expect("lock poisoned");
        records.entry(triple.clone()).or_default().events.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple() -> SessionTriple {
        SessionTriple::new("app", "user", Some("s1".to_string()))
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = StubSessionStore::new();
        store.create(&triple(), Some(Value::String("hi".to_string()))).await.unwrap();
        let got = store.get(&triple()).await.unwrap();
        assert_eq!(got, Some(Value::String("hi".to_string())));
    }

    #[tokio::test]
    async fn delete_then_get_returns_none() {
        let store = StubSessionStore::new();
        store.create(&triple(), None).await.unwrap();
        store.delete(&triple()).await.unwrap();
        assert_eq!(store.get(&triple()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_filters_by_prefix() {
        let store = StubSessionStore::new();
        store.create(&triple(), None).await.unwrap();
        store
            .create(&SessionTriple::new("other", "user", Some("s2".to_string())), None)
            .await
            .unwrap();
        let listed = store.list("app", "user").await.unwrap();
        assert_eq!(listed, vec![triple()]);
    }
}
