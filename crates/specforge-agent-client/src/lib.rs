//! HTTP client for one remote SpecForge agent.
//!
//! Each remote agent exposes the three pipeline endpoints
//! (`/spec/validate`, `/generate`, `/verify`) as an HTTP JSON API;
//! [`AgentClient`] wraps one agent's endpoint set behind the core
//! [`AgentApi`](specforge_core::AgentApi) trait.

mod client;
mod error;

pub use client::AgentClient;
pub use error::ClientError;
