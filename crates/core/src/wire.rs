//! JSON bodies exchanged between the coordinator and agent services.
//!
//! Responses reuse [`AgentResult`](crate::AgentResult), whose serialized
//! form is already the wire shape.

use serde::{Deserialize, Serialize};

/// Body of an agent's handle endpoint: `{"content": {"text": "..."}}`.
///
/// `content` is optional so the service can answer a missing field with its
/// own client error instead of a generic deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AgentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<RequestContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RequestContent {
    #[serde(default)]
    pub text: String,
}

impl AgentRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: Some(RequestContent { text: text.into() }),
        }
    }
}

/// Liveness answer of an agent service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentHealth {
    pub status: String,
    pub agent_type: String,
}

impl AgentHealth {
    pub fn healthy(agent_type: impl Into<String>) -> Self {
        Self {
            status: "healthy".into(),
            agent_type: agent_type.into(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
