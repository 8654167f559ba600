//! Session identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Auto-generated session identifier, used when a caller omits `session_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `(app_name, user_id, session_id)` tuple that uniquely identifies a session.
///
/// Uniqueness is global: no two sessions anywhere in a [`crate::OdaError`]-producing
/// runtime share the same triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionTriple {
    /// Application namespace.
    pub app_name: String,
    /// User identifier.
    pub user_id: String,
    /// Session identifier, scoped to `(app_name, user_id)`.
    pub session_id: String,
}

impl SessionTriple {
    /// Build a triple, generating `session_id` if none is supplied.
    #[must_use]
    pub fn new(app_name: impl Into<String>, user_id: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: session_id.unwrap_or_else(|| SessionId::new().to_string()),
        }
    }

    /// Whether this triple belongs to the given `(app_name, user_id)` prefix.
    #[must_use]
    pub fn matches_prefix(&self, app_name: &str, user_id: &str) -> bool {
        self.app_name == app_name && self.user_id == user_id
    }
}

impl fmt::Display for SessionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.app_name, self.user_id, self.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_session_id_when_omitted() {
        let t1 = SessionTriple::new("app", "u", None);
        let t2 = SessionTriple::new("app", "u", None);
        assert_ne!(t1.session_id, t2.session_id);
    }

    #[test]
    fn keeps_caller_supplied_session_id() {
        let t = SessionTriple::new("app", "u", Some("s1".to_string()));
        assert_eq!(t.session_id, "s1");
    }

    #[test]
    fn prefix_match() {
        let t = SessionTriple::new("app", "u", Some("s1".to_string()));
        assert!(t.matches_prefix("app", "u"));
        assert!(!t.matches_prefix("app", "other"));
    }
}
