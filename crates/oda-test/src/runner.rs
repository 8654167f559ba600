//! A scripted, queue-based [`Runner`] for exercising the retrying executor.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;
use oda_core::SessionTriple;
use oda_engine::{EngineError, EngineResult, Event, EventStream, Runner};

/// One scripted outcome for a single `run_async` call (one engine-call attempt).
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// The engine stream yields these events, then ends cleanly.
    Events(Vec<Event>),
    /// The engine stream yields these events, then raises `EngineError::RunFailed(msg)`.
    EventsThenError(Vec<Event>, String),
    /// The `run_async` call itself fails before any stream is produced.
    ImmediateError(String),
}

/// A deterministic, queue-based [`Runner`] for tests.
///
/// Outcomes are popped from the front of the queue on each call to `run_async`.
/// If the queue is exhausted, the last scripted outcome (if any) repeats so a
/// misconfigured test fails loudly rather than panicking on an empty queue.
pub struct StubRunner {
    outcomes: Mutex<VecDeque<AttemptOutcome>>,
    invocations: Mutex<Vec<(SessionTriple, Option<String>)>>,
}

impl StubRunner {
    /// Create a runner preloaded with the given per-attempt outcomes.
    #[must_use]
    pub fn new(outcomes: Vec<AttemptOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::from(outcomes)),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// The recorded `(triple, new_message)` pair for every `run_async` call, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn invocations(&self) -> Vec<(SessionTriple, Option<String>)> {
        self.invocations.lock().expect("lock poisoned").clone()
    }

    /// The number of times `run_async` has been called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.invocations.lock().expect("lock poisoned").len()
    }
}

#[async_trait]
impl Runner for StubRunner {
    async fn run_async(&self, triple: &SessionTriple, new_message: Option<&str>) -> EngineResult<EventStream> {
        self.invocations
            .lock()
            .expect("lock poisoned")
            .push((triple.clone(), new_message.map(ToString::to_string)));

        let outcome = {
            let mut outcomes = self.outcomes.lock().expect("lock poisoned");
            outcomes.pop_front().unwrap_or(AttemptOutcome::Events(Vec::new()))
        };

        match outcome {
            AttemptOutcome::ImmediateError(msg) => Err(EngineError::RunFailed(msg)),
            AttemptOutcome::Events(events) => {
                let items: Vec<EngineResult<Event>> = events.into_iter().map(Ok).collect();
                Ok(Box::pin(stream::iter(items)))
            }
            AttemptOutcome::EventsThenError(events, msg) => {
                let mut items: Vec<EngineResult<Event>> = events.into_iter().map(Ok).collect();
                items.push(Err(EngineError::RunFailed(msg)));
                Ok(Box::pin(stream::iter(items)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple() -> SessionTriple {
        SessionTriple::new("app", "user", Some("s1".to_string()))
    }

    fn event(text: &str) -> Event {
        Event {
            author: "assistant".to_string(),
            content: Some(oda_engine::Content::text(text)),
            actions: oda_engine::Actions::default(),
            error_code: None,
            error_message: None,
        }
    }

    #[tokio::test]
    async fn records_invocations_in_order() {
        use futures::StreamExt;

        let runner = StubRunner::new(vec![
            AttemptOutcome::EventsThenError(vec![event("first")], "boom".to_string()),
            AttemptOutcome::Events(vec![event("second")]),
        ]);

        let mut s1 = runner.run_async(&triple(), Some("hi")).await.unwrap();
        let r1: Vec<_> = (&mut s1).collect().await;
        assert!(r1.last().unwrap().is_err());

        let mut s2 = runner.run_async(&triple(), None).await.unwrap();
        let r2: Vec<_> = (&mut s2).collect().await;
        assert!(r2.last().unwrap().is_ok());

        let invocations = runner.invocations();
        assert_eq!(invocations.len(), 2);
        assert_eq!(invocations[0].1.as_deref(), Some("hi"));
        assert_eq!(invocations[1].1, None);
    }

    #[tokio::test]
    async fn immediate_error_returns_before_stream() {
        let runner = StubRunner::new(vec![AttemptOutcome::ImmediateError("nope".to_string())]);
        let result = runner.run_async(&triple(), Some("hi")).await;
        assert!(result.is_err());
        assert_eq!(runner.call_count(), 1);
    }
}
