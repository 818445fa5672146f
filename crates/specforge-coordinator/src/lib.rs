//! SpecForge coordination core.
//!
//! Distributes a batch of specifications across a fixed pool of remote
//! agents: a FIFO work queue feeds one worker per agent, each worker drives
//! the validate → generate → verify pipeline against its own agent session,
//! and the coordinator collects exactly one outcome per specification
//! before cancelling the pool.

pub mod config;
pub mod coordinator;
pub mod queue;
pub mod worker;

pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, CoordinatorError, InitFailure};
pub use queue::{ResultSink, WorkQueue};
pub use worker::Worker;
