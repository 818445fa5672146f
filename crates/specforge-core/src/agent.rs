//! The agent capability boundary.
//!
//! `AgentApi` is the seam between the dispatch loop and one remote agent's
//! protocol: a session lifecycle plus the three pipeline stages, each a
//! fallible round trip. The coordinator and workers are generic over this
//! trait, so tests can drive them against in-process stubs.

use crate::{AgentError, Spec, StackEffect, TestResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Response of the validation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the specification is acceptable to the agent.
    pub valid: bool,
    /// Optional rejection reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Response of the generation stage.
///
/// The remote returns either `{"code": ..., "tests": [...]}` or
/// `{"error": ...}`; the untagged variants are tried failure-first so a
/// payload carrying an error field is always read as a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationResult {
    /// The agent could not generate code.
    Failure {
        /// Remote error message.
        error: String,
    },
    /// Generated code plus derived test results.
    Success {
        /// Generated code for the word.
        code: String,
        /// Derived test results (may be absent on the wire).
        #[serde(default)]
        tests: Vec<TestResult>,
    },
}

/// Response of the verification stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether the generated code satisfies the stack effect.
    pub valid: bool,
}

/// One remote agent's network-exposed capability set.
///
/// A session must be opened before the first stage call and closed exactly
/// once during teardown; implementations are exclusively owned by a single
/// worker between those points.
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Open the agent's network session.
    async fn open(&mut self) -> Result<(), AgentError>;

    /// Release the agent's network session.
    fn close(&mut self);

    /// Ask the agent whether the specification is acceptable.
    async fn validate(&self, spec: &Spec) -> Result<ValidationResult, AgentError>;

    /// Ask the agent to generate code for the specification.
    async fn generate(&self, spec: &Spec) -> Result<GenerationResult, AgentError>;

    /// Ask the agent whether `code` satisfies `effect`.
    async fn verify(&self, code: &str, effect: &StackEffect)
        -> Result<VerificationResult, AgentError>;
}
