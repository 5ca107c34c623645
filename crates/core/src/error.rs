//! Error types for the triage domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Only *hard* failures live here: an unreachable agent, a timeout, a
//! malformed response. "Nothing found" outcomes are ordinary
//! [`AgentResult`](crate::AgentResult)s and never become errors.

use thiserror::Error;

/// The top-level error type for all triage operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Dispatch errors ---
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    // --- Coordinator errors ---
    #[error("Coordinator error: {0}")]
    Coordinator(#[from] CoordinatorError),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

// --- Bounded context errors ---

/// A single agent call that did not produce a usable response.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error("Agent service unavailable: {0}")]
    Network(String),

    #[error("Agent returned status {status_code}: {body}")]
    Status { status_code: u16, body: String },

    #[error("Agent '{agent}' timed out after {timeout_ms}ms")]
    Timeout { agent: String, timeout_ms: u64 },

    #[error("Invalid agent response: {0}")]
    InvalidResponse(String),

    #[error("Agent failed: {0}")]
    AgentFailed(String),
}

impl DispatchError {
    /// Whether the failure was the per-call timeout firing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Failure of a whole fan-out, as seen by the caller.
#[derive(Debug, Clone, Error)]
pub enum CoordinatorError {
    #[error("All agent services are unavailable ({attempted} attempted)")]
    NoAgentsAvailable { attempted: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_correctly() {
        let err = Error::Dispatch(DispatchError::Status {
            status_code: 503,
            body: "down for maintenance".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("down for maintenance"));
    }

    #[test]
    fn timeout_error_names_the_agent() {
        let err = DispatchError::Timeout {
            agent: "medication".into(),
            timeout_ms: 250,
        };
        assert!(err.is_timeout());
        assert!(err.to_string().contains("medication"));
        assert!(err.to_string().contains("250ms"));
    }

    #[test]
    fn no_agents_available_mentions_unavailability() {
        let err = Error::from(CoordinatorError::NoAgentsAvailable { attempted: 4 });
        assert!(err.to_string().contains("All agent services are unavailable"));
    }
}
