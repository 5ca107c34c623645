//! # Triage Core
//!
//! Domain types, traits, and error definitions for the triage agents.
//! This crate has **no async or HTTP dependencies**: it defines the domain
//! model that the agents, the coordinator, and the HTTP gateway build on.
//!
//! ## Layout
//!
//! - [`note`] — the normalized input text every agent receives
//! - [`extract`] — ordered labeled-field patterns ("first pattern wins")
//! - [`rules`] — keyword-rule tables matched by substring containment
//! - [`agent`] — the `Agent` trait and the uniform `AgentResult`
//! - [`error`] — hard (transport) failures; soft failures are plain results
//! - [`wire`] — JSON bodies exchanged with agent services

pub mod agent;
pub mod error;
pub mod extract;
pub mod note;
pub mod rules;
pub mod wire;

// Re-export key types at crate root for ergonomics
pub use agent::{Agent, AgentContent, AgentKind, AgentReply, AgentResult, ContentType};
pub use error::{CoordinatorError, DispatchError, Error};
pub use extract::{ExtractedField, FieldExtractor, FieldPattern, FieldValue};
pub use note::{Note, normalize};
pub use rules::{Rule, RuleMatch, RuleTable};
pub use wire::{AgentHealth, AgentRequest, RequestContent};
