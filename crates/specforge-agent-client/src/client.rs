//! HTTP client for a remote agent's pipeline endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use specforge_core::{
    AgentApi, AgentError, GenerationResult, Spec, StackEffect, ValidationResult,
    VerificationResult,
};

use crate::error::ClientError;

/// Wire body of the verification stage.
#[derive(Serialize)]
struct VerifyRequest {
    code: String,
    effect: String,
}

/// HTTP client for one remote agent.
///
/// Owns the agent's network session: `open` must be called before the first
/// stage call and `close` exactly once during teardown. The session is
/// exclusively owned by one worker at a time.
pub struct AgentClient {
    base_url: String,
    request_timeout: Duration,
    session: Option<reqwest::Client>,
}

impl AgentClient {
    /// Create a new client for the agent at `base_url`. The session is not
    /// opened yet.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
            session: None,
        }
    }

    /// The agent's base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the session is currently open.
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    fn session(&self) -> Result<&reqwest::Client, ClientError> {
        self.session.as_ref().ok_or(ClientError::SessionClosed)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "POST request");

        let response = self.session()?.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl AgentApi for AgentClient {
    async fn open(&mut self) -> Result<(), AgentError> {
        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| AgentError::new(e.to_string()))?;
        self.session = Some(client);
        debug!(url = %self.base_url, "Agent session opened");
        Ok(())
    }

    fn close(&mut self) {
        self.session = None;
        debug!(url = %self.base_url, "Agent session closed");
    }

    async fn validate(&self, spec: &Spec) -> Result<ValidationResult, AgentError> {
        self.post_json("/spec/validate", spec)
            .await
            .map_err(AgentError::from)
    }

    async fn generate(&self, spec: &Spec) -> Result<GenerationResult, AgentError> {
        self.post_json("/generate", spec)
            .await
            .map_err(AgentError::from)
    }

    async fn verify(
        &self,
        code: &str,
        effect: &StackEffect,
    ) -> Result<VerificationResult, AgentError> {
        let body = VerifyRequest {
            code: code.to_string(),
            effect: effect.to_string(),
        };
        self.post_json("/verify", &body)
            .await
            .map_err(AgentError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let client = AgentClient::new("http://localhost:8080/", Duration::from_secs(30));
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_stage_call_before_open_fails() {
        let client = AgentClient::new("http://localhost:8080", Duration::from_secs(30));
        let spec = Spec::new("square", "( n -- n² )".parse().unwrap(), "DUP_TRANSFORM_001");

        let err = client.validate(&spec).await.unwrap_err();
        assert_eq!(err.message(), "agent session is not open");
    }

    #[tokio::test]
    async fn test_open_and_close_toggle_session() {
        let mut client = AgentClient::new("http://localhost:8080", Duration::from_secs(30));
        assert!(!client.is_open());

        client.open().await.unwrap();
        assert!(client.is_open());

        client.close();
        assert!(!client.is_open());
    }
}
