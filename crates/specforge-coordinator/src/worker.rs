//! Per-agent dispatch loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use specforge_core::{AgentApi, FailureKind, GenerationResult, Outcome, Spec};

use crate::queue::{ResultSink, WorkQueue};

/// One dispatch loop, exclusively owning one agent session.
///
/// Each iteration checks for cancellation, attempts a timed dequeue, and on
/// success drives the dequeued Spec through the agent pipeline, publishing
/// exactly one Outcome. A dequeue timeout is a quiet retry, not a failure.
pub struct Worker<A> {
    id: usize,
    agent: A,
    queue: Arc<WorkQueue>,
    sink: Arc<ResultSink>,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl<A: AgentApi> Worker<A> {
    /// Create a worker over one agent session.
    pub fn new(
        id: usize,
        agent: A,
        queue: Arc<WorkQueue>,
        sink: Arc<ResultSink>,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            agent,
            queue,
            sink,
            poll_interval,
            cancel,
        }
    }

    /// Run until cancelled, then hand the agent back for teardown.
    ///
    /// Cancellation is observed at the top of each iteration only; a spec
    /// already dequeued is carried through the full pipeline first, so its
    /// Outcome is never lost.
    pub async fn run(self) -> A {
        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let Some(spec) = self.queue.get(self.poll_interval).await else {
                // No work available yet, go back around.
                continue;
            };

            debug!(worker = self.id, spec_id = %spec.id, "Dispatching spec");
            let outcome = self.process(&spec).await;
            debug!(
                worker = self.id,
                spec_id = %outcome.spec_id,
                success = outcome.is_success(),
                latency_ms = outcome.latency_ms,
                "Publishing outcome"
            );
            self.sink.put(outcome);
        }

        debug!(worker = self.id, "Worker stopped");
        self.agent
    }

    /// Drive one Spec through validate → generate → verify.
    ///
    /// Total: every stage rejection and every transport failure folds into
    /// a failure Outcome here, so the coordinator always collects exactly
    /// one Outcome per dispatched Spec. The first stage to reject or fail
    /// short-circuits the rest.
    async fn process(&self, spec: &Spec) -> Outcome {
        let started = Instant::now();
        let id = spec.id.clone();

        let validation = match self.agent.validate(spec).await {
            Ok(validation) => validation,
            Err(e) => {
                return Outcome::failure(
                    id,
                    FailureKind::NetworkFailure,
                    e.message(),
                    started.elapsed(),
                )
            }
        };
        if !validation.valid {
            let message = validation
                .reason
                .unwrap_or_else(|| FailureKind::InvalidSpecification.to_string());
            return Outcome::failure(
                id,
                FailureKind::InvalidSpecification,
                message,
                started.elapsed(),
            );
        }

        let generated = match self.agent.generate(spec).await {
            Ok(generated) => generated,
            Err(e) => {
                return Outcome::failure(
                    id,
                    FailureKind::NetworkFailure,
                    e.message(),
                    started.elapsed(),
                )
            }
        };
        let (code, tests) = match generated {
            GenerationResult::Failure { error } => {
                return Outcome::failure(
                    id,
                    FailureKind::GenerationFailed,
                    error,
                    started.elapsed(),
                )
            }
            GenerationResult::Success { code, tests } => (code, tests),
        };

        let verification = match self.agent.verify(&code, &spec.effect).await {
            Ok(verification) => verification,
            Err(e) => {
                return Outcome::failure(
                    id,
                    FailureKind::NetworkFailure,
                    e.message(),
                    started.elapsed(),
                )
            }
        };
        if !verification.valid {
            return Outcome::failure(
                id,
                FailureKind::StackEffectMismatch,
                FailureKind::StackEffectMismatch.to_string(),
                started.elapsed(),
            );
        }

        Outcome::success(id, code, tests, started.elapsed())
    }
}
