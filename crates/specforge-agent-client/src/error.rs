//! Error types for the agent client.

use specforge_core::AgentError;
use thiserror::Error;

/// Errors that can occur when talking to a remote agent.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The session was used before `open` or after `close`.
    #[error("agent session is not open")]
    SessionClosed,

    /// Transport-level HTTP error (connection, timeout, malformed body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The agent answered with a non-success status.
    #[error("agent returned HTTP {status} for {path}")]
    Status { status: u16, path: String },
}

impl From<ClientError> for AgentError {
    fn from(err: ClientError) -> Self {
        AgentError::new(err.to_string())
    }
}
