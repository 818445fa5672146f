//! Failure taxonomy and agent-facing errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a failed Outcome.
///
/// An empty work queue is deliberately not part of this taxonomy: workers
/// treat it as a retry signal (`WorkQueue::get` returning `None`), never as
/// a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// The validation stage rejected the specification.
    InvalidSpecification,
    /// The generation stage returned an error payload.
    GenerationFailed,
    /// The verification stage rejected the generated code.
    StackEffectMismatch,
    /// A connection, timeout, or transport-level failure at any stage.
    NetworkFailure,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InvalidSpecification => "Invalid specification",
            Self::GenerationFailed => "Generation failed",
            Self::StackEffectMismatch => "Stack effect mismatch",
            Self::NetworkFailure => "Network failure",
        };
        write!(f, "{}", text)
    }
}

/// Transport-level failure reported by an agent implementation.
///
/// Kept message-only so the `AgentApi` trait stays agnostic of the
/// transport; concrete clients convert their own error types into this at
/// the trait boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AgentError {
    message: String,
}

impl AgentError {
    /// Create an AgentError from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(
            FailureKind::InvalidSpecification.to_string(),
            "Invalid specification"
        );
        assert_eq!(
            FailureKind::StackEffectMismatch.to_string(),
            "Stack effect mismatch"
        );
    }

    #[test]
    fn test_agent_error_message() {
        let err = AgentError::new("connection refused");
        assert_eq!(err.message(), "connection refused");
        assert_eq!(err.to_string(), "connection refused");
    }
}
