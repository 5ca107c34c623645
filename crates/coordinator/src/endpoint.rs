//! Agent endpoints — how the coordinator reaches one agent.
//!
//! [`HttpAgentEndpoint`] talks to an agent service wrapper over HTTP;
//! [`LocalAgentEndpoint`] calls an in-process agent. The coordinator treats
//! both the same way and bounds every call with its own timeout.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use triage_core::{Agent, AgentHealth, AgentRequest, AgentResult, DispatchError, Note};

/// The seam between the coordinator and one agent.
#[async_trait]
pub trait AgentEndpoint: Send + Sync {
    /// Where this endpoint points (URL or `local:<kind>`), for logs.
    fn target(&self) -> String;

    /// Send one normalized note and wait for the agent's result.
    async fn dispatch(&self, note: &Note) -> Result<AgentResult, DispatchError>;

    /// Ask the agent whether it is alive.
    async fn probe(&self) -> Result<AgentHealth, DispatchError>;
}

/// An agent service reached over HTTP.
pub struct HttpAgentEndpoint {
    url: String,
    health_url: String,
    client: reqwest::Client,
}

impl HttpAgentEndpoint {
    /// `url` is the handle endpoint; `base_url` is where `/health` lives.
    pub fn new(url: impl Into<String>, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            health_url: format!("{}/health", base_url.trim_end_matches('/')),
            client,
        }
    }

    async fn error_for_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, DispatchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "Agent service returned error");
        Err(DispatchError::Status {
            status_code: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl AgentEndpoint for HttpAgentEndpoint {
    fn target(&self) -> String {
        self.url.clone()
    }

    async fn dispatch(&self, note: &Note) -> Result<AgentResult, DispatchError> {
        debug!(url = %self.url, chars = note.as_str().len(), "Sending note to agent");

        let response = self
            .client
            .post(&self.url)
            .json(&AgentRequest::text(note.as_str()))
            .send()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        let response = Self::error_for_status(response).await?;

        response
            .json::<AgentResult>()
            .await
            .map_err(|e| DispatchError::InvalidResponse(format!("Failed to parse response: {e}")))
    }

    async fn probe(&self) -> Result<AgentHealth, DispatchError> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        let response = Self::error_for_status(response).await?;

        response
            .json::<AgentHealth>()
            .await
            .map_err(|e| DispatchError::InvalidResponse(format!("Failed to parse health: {e}")))
    }
}

/// An agent running in this process.
///
/// The agent runs on the blocking pool so a panicking agent surfaces as a
/// dispatch failure instead of tearing down the whole fan-out.
pub struct LocalAgentEndpoint {
    agent: Arc<dyn Agent>,
}

impl LocalAgentEndpoint {
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl AgentEndpoint for LocalAgentEndpoint {
    fn target(&self) -> String {
        format!("local:{}", self.agent.kind())
    }

    async fn dispatch(&self, note: &Note) -> Result<AgentResult, DispatchError> {
        let agent = self.agent.clone();
        let note = note.clone();
        tokio::task::spawn_blocking(move || agent.handle(&note))
            .await
            .map_err(|e| DispatchError::AgentFailed(e.to_string()))
    }

    async fn probe(&self) -> Result<AgentHealth, DispatchError> {
        Ok(AgentHealth::healthy(self.agent.kind().type_name()))
    }
}
