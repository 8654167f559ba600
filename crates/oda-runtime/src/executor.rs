//! `RetryingExecutor` — exactly-once message submission, retry-from-state, and
//! event injection around one engine [`Runner`].

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use futures::{Stream, StreamExt};
use oda_core::SessionTriple;
use oda_engine::{Event, Runner};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A stream of events the consumer can rely on never raising: every failure
/// the executor cannot recover from is converted into a terminal `Event`.
pub type RetryStream = Pin<Box<dyn Stream<Item = Event> + Send>>;

/// Wraps one engine [`Runner`], bound to one session triple, implementing the
/// exactly-once-submit / retry-from-state / event-injection protocol.
///
/// Owned by exactly one [`crate::Session`]; disposed when that session cleans
/// up its agent pool.
pub struct RetryingExecutor {
    triple: SessionTriple,
    runner: Arc<dyn Runner>,
    max_retries: u32,
    cancel: CancellationToken,
}

impl RetryingExecutor {
    /// Wrap `runner`, bound to `triple`, with a retry budget of `max_retries`.
    #[must_use]
    pub fn new(triple: SessionTriple, runner: Arc<dyn Runner>, max_retries: u32) -> Self {
        Self {
            triple,
            runner,
            max_retries,
            cancel: CancellationToken::new(),
        }
    }

    /// Request cancellation. Honored at the executor's next suspension point:
    /// mid-run, or during a retry-delay sleep. No further events are emitted
    /// after cancellation takes effect.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Run `message` against the bound agent, producing a forward-only,
    /// non-restartable stream of events.
    ///
    /// `message` is submitted to the engine on the first attempt only; every
    /// retry attempt invokes the engine with no new message, relying on the
    /// engine having already appended it to session history on attempt 1.
    pub fn run_async(&self, message: String) -> RetryStream {
        let triple = self.triple.clone();
        let runner = Arc::clone(&self.runner);
        let max_retries = self.max_retries;
        let cancel = self.cancel.clone();

        Box::pin(stream! {
            // 0-based count of run attempts already completed (and failed); also
            // the number of retry events already emitted.
            let mut attempt: u32 = 0;
            let mut new_message = Some(message);

            loop {
                if cancel.is_cancelled() {
                    return;
                }

                let run_result = tokio::select! {
                    biased;
                    () = cancel.cancelled() => None,
                    result = runner.run_async(&triple, new_message.as_deref()) => Some(result),
                };

                let mut attempt_failed;
                let mut terminal_error = false;

                match run_result {
                    None => return,
                    Some(Err(_e)) => {
                        attempt_failed = true;
                    }
                    Some(Ok(mut engine_stream)) => {
                        attempt_failed = false;
                        loop {
                            let next = tokio::select! {
                                biased;
                                () = cancel.cancelled() => None,
                                item = engine_stream.next() => Some(item),
                            };
                            match next {
                                None => return,
                                Some(None) => break,
                                Some(Some(Ok(event))) => {
                                    terminal_error = event.is_unclassified_error();
                                    yield event;
                                }
                                Some(Some(Err(_e))) => {
                                    attempt_failed = true;
                                    break;
                                }
                            }
                        }
                        if !attempt_failed && terminal_error {
                            attempt_failed = true;
                        }
                    }
                }

                if !attempt_failed {
                    info!(triple = %triple, attempt, "agent run completed successfully");
                    return;
                }

                if attempt < max_retries {
                    let retry_number = attempt.saturating_add(1);
                    warn!(triple = %triple, retry_number, max_retries, "agent run failed, retrying");
                    yield Event::retry_attempt(retry_number, max_retries);

                    let delay = Duration::from_secs(2u64.saturating_pow(attempt));
                    let slept = tokio::select! {
                        biased;
                        () = cancel.cancelled() => false,
                        () = tokio::time::sleep(delay) => true,
                    };
                    if !slept {
                        return;
                    }
                    attempt = attempt.saturating_add(1);
                    new_message = None;
                } else {
                    warn!(triple = %triple, max_retries, "agent run exhausted retry budget");
                    yield Event::max_retries_exceeded(max_retries);
                    return;
                }
            }
        })
    }

    /// Run `message` to completion, returning the full event sequence.
    ///
    /// Synchronous mirror of [`Self::run_async`] with identical semantics.
    pub async fn run(&self, message: String) -> Vec<Event> {
        self.run_async(message).collect().await
    }
}
