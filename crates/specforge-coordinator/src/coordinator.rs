//! Batch lifecycle: initialize → submit → collect → cancel → teardown.

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use specforge_core::{AgentApi, AgentError, Outcome, Spec};

use crate::config::CoordinatorConfig;
use crate::queue::{ResultSink, WorkQueue};
use crate::worker::Worker;

/// One agent session that failed to open.
#[derive(Debug)]
pub struct InitFailure {
    /// Position of the agent in the pool.
    pub index: usize,
    /// Why its session did not open.
    pub error: AgentError,
}

/// Coordinator errors.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// One or more agent sessions failed to open. Sessions that did open
    /// stay open; the caller decides whether to close or proceed.
    #[error("{} agent session(s) failed to open", .failures.len())]
    Initialize { failures: Vec<InitFailure> },

    /// The result channel closed before the batch was fully collected.
    #[error("result channel closed after {collected} of {expected} outcomes")]
    Collect { collected: usize, expected: usize },

    /// A non-empty batch was submitted to a pool with no agents.
    #[error("cannot process a batch with an empty agent pool")]
    EmptyPool,
}

/// Coordinates a fixed pool of agents over a shared work queue.
///
/// The pool size is fixed at construction and independent of batch size:
/// with fewer specs than agents some workers never dequeue anything, with
/// more specs than agents workers are reused across specs. Coordinators
/// hold no global state; any number can run side by side in one process.
pub struct Coordinator<A> {
    config: CoordinatorConfig,
    agents: Vec<A>,
    queue: Arc<WorkQueue>,
    sink: Arc<ResultSink>,
}

impl<A: AgentApi + Send + 'static> Coordinator<A> {
    /// Create a coordinator over the given agent pool.
    pub fn new(config: CoordinatorConfig, agents: Vec<A>) -> Self {
        Self {
            config,
            agents,
            queue: Arc::new(WorkQueue::new()),
            sink: Arc::new(ResultSink::new()),
        }
    }

    /// Number of agents (and therefore workers) in the pool.
    pub fn worker_count(&self) -> usize {
        self.agents.len()
    }

    /// Open every agent session concurrently.
    ///
    /// Sessions that fail to open are reported together by pool index;
    /// sessions that did open are left open for the caller to close.
    pub async fn initialize(&mut self) -> Result<(), CoordinatorError> {
        let results = join_all(self.agents.iter_mut().map(|agent| agent.open())).await;

        let failures: Vec<InitFailure> = results
            .into_iter()
            .enumerate()
            .filter_map(|(index, result)| result.err().map(|error| InitFailure { index, error }))
            .collect();

        if failures.is_empty() {
            info!(agents = self.agents.len(), "All agent sessions open");
            Ok(())
        } else {
            Err(CoordinatorError::Initialize { failures })
        }
    }

    /// Process a batch of specs across the pool.
    ///
    /// Starts one worker per agent, enqueues every spec in the given order,
    /// then collects exactly `specs.len()` outcomes before requesting
    /// cancellation, in that order, so no in-flight outcome is lost.
    /// Returns outcomes in completion order, not submission order.
    ///
    /// An empty batch returns an empty Vec without starting any worker.
    pub async fn run(&mut self, specs: Vec<Spec>) -> Result<Vec<Outcome>, CoordinatorError> {
        if specs.is_empty() {
            return Ok(Vec::new());
        }
        if self.agents.is_empty() {
            // Nothing would ever drain the queue.
            return Err(CoordinatorError::EmptyPool);
        }

        let expected = specs.len();
        info!(
            specs = expected,
            workers = self.agents.len(),
            "Processing batch"
        );
        let started = Instant::now();

        let cancel = CancellationToken::new();
        let mut workers = JoinSet::new();
        for (id, agent) in self.agents.drain(..).enumerate() {
            let worker = Worker::new(
                id,
                agent,
                Arc::clone(&self.queue),
                Arc::clone(&self.sink),
                self.config.poll_interval,
                cancel.clone(),
            );
            workers.spawn(worker.run());
        }

        for spec in specs {
            self.queue.put(spec);
        }

        let mut outcomes = Vec::with_capacity(expected);
        while outcomes.len() < expected {
            match self.sink.recv().await {
                Some(outcome) => {
                    outcomes.push(outcome);
                    if outcomes.len() % 10 == 0 {
                        info!(completed = outcomes.len(), total = expected, "Batch progress");
                    }
                }
                None => {
                    cancel.cancel();
                    return Err(CoordinatorError::Collect {
                        collected: outcomes.len(),
                        expected,
                    });
                }
            }
        }

        // Every expected outcome is in hand; only now is it safe to stop
        // the pool.
        cancel.cancel();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(agent) => self.agents.push(agent),
                Err(e) => warn!(error = %e, "Worker task did not shut down cleanly"),
            }
        }

        let elapsed = started.elapsed();
        let successful = outcomes.iter().filter(|o| o.is_success()).count();
        info!(
            completed = expected,
            successful,
            failed = expected - successful,
            elapsed_ms = elapsed.as_millis() as u64,
            throughput_per_sec = expected as f64 / elapsed.as_secs_f64(),
            "Batch complete"
        );

        Ok(outcomes)
    }

    /// Release every agent session, each attempted independently.
    pub fn close(&mut self) {
        for agent in &mut self.agents {
            agent.close();
        }
        info!(agents = self.agents.len(), "Agent sessions closed");
    }
}
