//! # Triage Coordinator
//!
//! Broadcasts one clinical note to every registered agent concurrently,
//! bounds each call with its own timeout, and aggregates the replies in
//! registration order. Agents are reached through [`AgentEndpoint`]:
//! over HTTP ([`HttpAgentEndpoint`]) or in-process ([`LocalAgentEndpoint`]).

pub mod coordinator;
pub mod endpoint;

pub use coordinator::{AgentStatus, Coordinator, DispatchOutcome, Registration};
pub use endpoint::{AgentEndpoint, HttpAgentEndpoint, LocalAgentEndpoint};
