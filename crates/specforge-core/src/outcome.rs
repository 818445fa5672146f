//! Outcome types.

use crate::{FailureKind, SpecId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The terminal result of processing one Spec.
///
/// Exactly one Outcome is produced per dispatched Spec, whether the
/// pipeline completed or short-circuited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Identifier of the originating Spec.
    pub spec_id: SpecId,

    /// Success artifacts or failure classification.
    pub status: OutcomeStatus,

    /// Elapsed wall-clock time from pipeline start to completion or
    /// short-circuit, in milliseconds.
    pub latency_ms: u64,
}

/// Success artifacts or classified failure for an Outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The pipeline completed and verification passed.
    Success {
        /// Generated code for the word.
        code: String,
        /// Ordered test results derived from the Spec's test cases.
        tests: Vec<TestResult>,
    },
    /// The pipeline short-circuited or a stage failed.
    Failure {
        /// Failure classification.
        kind: FailureKind,
        /// Human-readable failure message.
        message: String,
    },
}

impl Outcome {
    /// Create a success Outcome.
    pub fn success(spec_id: SpecId, code: String, tests: Vec<TestResult>, elapsed: Duration) -> Self {
        Self {
            spec_id,
            status: OutcomeStatus::Success { code, tests },
            latency_ms: elapsed.as_millis() as u64,
        }
    }

    /// Create a failure Outcome.
    pub fn failure(
        spec_id: SpecId,
        kind: FailureKind,
        message: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            spec_id,
            status: OutcomeStatus::Failure {
                kind,
                message: message.into(),
            },
            latency_ms: elapsed.as_millis() as u64,
        }
    }

    /// Whether the pipeline completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success { .. })
    }

    /// The failure classification, if this Outcome failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.status {
            OutcomeStatus::Failure { kind, .. } => Some(*kind),
            OutcomeStatus::Success { .. } => None,
        }
    }

    /// The failure message, if this Outcome failed.
    pub fn failure_message(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Failure { message, .. } => Some(message),
            OutcomeStatus::Success { .. } => None,
        }
    }
}

/// Result of running one acceptance test case against generated code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Stack contents supplied to the word.
    pub input: Vec<i64>,
    /// Stack contents the test case expected.
    pub expected: Vec<i64>,
    /// Whether the generated code produced the expected stack.
    pub passed: bool,
}
