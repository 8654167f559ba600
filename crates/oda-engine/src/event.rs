//! The `Event` shape forwarded from the engine, and the two shapes the core injects itself.

use serde::{Deserialize, Serialize};

/// Error code the core stamps on an injected retry event.
pub const ERROR_CODE_RETRY_ATTEMPT: &str = "RETRY_ATTEMPT";

/// Error code the core stamps on an injected final-failure event.
pub const ERROR_CODE_MAX_RETRIES_EXCEEDED: &str = "MAX_RETRIES_EXCEEDED";

/// One piece of event content (text today; the engine may add richer parts later).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// The text of this part.
    pub text: String,
}

impl Part {
    /// Build a text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Event content: an ordered sequence of parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// The parts making up this content.
    pub parts: Vec<Part>,
}

impl Content {
    /// Build single-part text content.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::text(text)],
        }
    }
}

/// Side-effect actions attached to an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actions {
    /// Whether this event should escalate to a human/operator.
    #[serde(default)]
    pub escalate: bool,
}

/// One element of an agent run's event stream.
///
/// The core only ever *produces* two shapes of this type itself (retry and
/// final-failure, see [`Event::retry_attempt`] and [`Event::max_retries_exceeded`])
/// and otherwise forwards engine events unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Who produced this event (`"system"` for core-injected events).
    pub author: String,
    /// Event content, if any.
    pub content: Option<Content>,
    /// Side-effect actions attached to the event.
    #[serde(default)]
    pub actions: Actions,
    /// Machine-readable error code, if this event represents an error.
    pub error_code: Option<String>,
    /// Human-readable error message, if this event represents an error.
    pub error_message: Option<String>,
}

impl Event {
    /// Whether this event carries an error code other than `RETRY_ATTEMPT`.
    ///
    /// Used by the retrying executor to classify a terminal engine event as a
    /// retryable failure (see the failure-classification design note).
    #[must_use]
    pub fn is_unclassified_error(&self) -> bool {
        matches!(&self.error_code, Some(code) if code != ERROR_CODE_RETRY_ATTEMPT)
    }

    /// Build the retry event injected before reattempting a failed run.
    ///
    /// `attempt` is the 1-based attempt number about to start; `max_retries` is `M`.
    #[must_use]
    pub fn retry_attempt(attempt: u32, max_retries: u32) -> Self {
        let message = format!("Retry attempt {attempt}/{max_retries} for agent execution");
        Self {
            author: "system".to_string(),
            content: Some(Content::text(message.clone())),
            actions: Actions::default(),
            error_code: Some(ERROR_CODE_RETRY_ATTEMPT.to_string()),
            error_message: Some(message),
        }
    }

    /// Build the terminal event emitted once retries are exhausted.
    #[must_use]
    pub fn max_retries_exceeded(max_retries: u32) -> Self {
        Self {
            author: "system".to_string(),
            content: None,
            actions: Actions { escalate: true },
            error_code: Some(ERROR_CODE_MAX_RETRIES_EXCEEDED.to_string()),
            error_message: Some(format!(
                "Agent execution failed after {max_retries} retry attempts"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_attempt_shape() {
        let e = Event::retry_attempt(1, 3);
        assert_eq!(e.author, "system");
        assert_eq!(e.error_code.as_deref(), Some(ERROR_CODE_RETRY_ATTEMPT));
        assert_eq!(
            e.content.unwrap().parts[0].text,
            "Retry attempt 1/3 for agent execution"
        );
    }

    #[test]
    fn max_retries_exceeded_shape() {
        let e = Event::max_retries_exceeded(3);
        assert!(e.content.is_none());
        assert!(e.actions.escalate);
        assert_eq!(
            e.error_code.as_deref(),
            Some(ERROR_CODE_MAX_RETRIES_EXCEEDED)
        );
    }

    #[test]
    fn unclassified_error_detection() {
        let retry = Event::retry_attempt(1, 3);
        assert!(!retry.is_unclassified_error());

        let mut other = Event::retry_attempt(1, 3);
        other.error_code = Some("SOME_OTHER_CODE".to_string());
        assert!(other.is_unclassified_error());

        let mut clean = Event::retry_attempt(1, 3);
        clean.error_code = None;
        assert!(!clean.is_unclassified_error());
    }
}
