//! Fan-out coordination.
//!
//! ```text
//!              Note
//!               │
//!               ▼
//!        ┌─────────────┐
//!        │ Coordinator │  ← normalizes, fans out, aggregates in order
//!        └┬───┬───┬───┬┘
//!         ▼   ▼   ▼   ▼
//!        A-1 A-2 A-3 A-4   ← each call bounded by its own timeout
//! ```
//!
//! One agent failing (transport error, bad status, timeout) only removes
//! that agent's entry from the aggregate. Only when every agent fails does
//! the caller see an error.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use triage_config::AppConfig;
use triage_core::{
    AgentHealth, AgentReply, AgentResult, CoordinatorError, DispatchError, Error, Note,
};

use crate::endpoint::{AgentEndpoint, HttpAgentEndpoint, LocalAgentEndpoint};

/// One registered agent.
pub struct Registration {
    pub name: String,
    pub endpoint: Arc<dyn AgentEndpoint>,
    pub timeout: Duration,
}

/// What happened to one agent during a fan-out.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub agent_name: String,
    pub result: Result<AgentResult, DispatchError>,
}

/// Health of one registered agent.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AgentStatus {
    pub name: String,
    pub target: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Broadcasts a note to a fixed set of agents and aggregates the replies.
pub struct Coordinator {
    agents: Vec<Registration>,
}

impl Coordinator {
    /// Create a coordinator with no agents.
    pub fn new() -> Self {
        Self { agents: Vec::new() }
    }

    /// Create a coordinator over an explicit, ordered agent list.
    pub fn with_registrations(agents: Vec<Registration>) -> Self {
        Self { agents }
    }

    /// Register an agent. Replies are reported in registration order.
    pub fn register(
        mut self,
        name: impl Into<String>,
        endpoint: Arc<dyn AgentEndpoint>,
        timeout: Duration,
    ) -> Self {
        self.agents.push(Registration {
            name: name.into(),
            endpoint,
            timeout,
        });
        self
    }

    /// Coordinator reaching every configured agent over HTTP.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;

        let coordinator = config.agents.iter().fold(Self::new(), |c, agent| {
            let endpoint = HttpAgentEndpoint::new(&agent.url, &agent.base_url(), client.clone());
            c.register(&agent.name, Arc::new(endpoint), config.agent_timeout(agent))
        });

        info!(agents = coordinator.len(), "Coordinator configured with HTTP agents");
        Ok(coordinator)
    }

    /// Coordinator running every configured agent in-process.
    pub fn local(config: &AppConfig) -> Self {
        config.agents.iter().fold(Self::new(), |c, agent| {
            let endpoint = LocalAgentEndpoint::new(triage_agents::build_agent(agent.kind));
            c.register(&agent.name, Arc::new(endpoint), config.agent_timeout(agent))
        })
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Registered agent names, in registration order.
    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|r| r.name.as_str()).collect()
    }

    /// Send `note` to every agent concurrently and report each outcome, in
    /// registration order regardless of completion order.
    pub async fn dispatch_all(&self, note: &Note) -> Vec<DispatchOutcome> {
        let calls = self.agents.iter().map(|reg| async move {
            let result = match tokio::time::timeout(reg.timeout, reg.endpoint.dispatch(note)).await
            {
                Ok(result) => result,
                Err(_) => Err(DispatchError::Timeout {
                    agent: reg.name.clone(),
                    timeout_ms: reg.timeout.as_millis() as u64,
                }),
            };
            DispatchOutcome {
                agent_name: reg.name.clone(),
                result,
            }
        });
        join_all(calls).await
    }

    /// Analyze one note: every agent that answers contributes one reply.
    ///
    /// Failures of individual agents are logged and skipped. Fails with
    /// [`CoordinatorError::NoAgentsAvailable`] only when no agent answered.
    #[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
    pub async fn analyze(&self, raw_text: &str) -> Result<Vec<AgentReply>, CoordinatorError> {
        let note = Note::new(raw_text);
        debug!(chars = note.as_str().len(), agents = self.len(), "Analyzing note");

        let outcomes = self.dispatch_all(&note).await;
        let attempted = outcomes.len();

        let replies: Vec<AgentReply> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome.result {
                Ok(response) => Some(AgentReply {
                    agent_name: outcome.agent_name,
                    response,
                }),
                Err(e) => {
                    warn!(agent = %outcome.agent_name, error = %e, "Agent call failed, skipping");
                    None
                }
            })
            .collect();

        if replies.is_empty() {
            warn!(attempted, "No agent answered");
            return Err(CoordinatorError::NoAgentsAvailable { attempted });
        }

        info!(succeeded = replies.len(), attempted, "Analysis complete");
        Ok(replies)
    }

    /// Probe every agent's health, in registration order.
    pub async fn probe_all(&self) -> Vec<AgentStatus> {
        let probes = self.agents.iter().map(|reg| async move {
            let outcome: Result<AgentHealth, DispatchError> =
                match tokio::time::timeout(reg.timeout, reg.endpoint.probe()).await {
                    Ok(result) => result,
                    Err(_) => Err(DispatchError::Timeout {
                        agent: reg.name.clone(),
                        timeout_ms: reg.timeout.as_millis() as u64,
                    }),
                };
            match outcome {
                Ok(health) => AgentStatus {
                    name: reg.name.clone(),
                    target: reg.endpoint.target(),
                    healthy: health.is_healthy(),
                    agent_type: Some(health.agent_type),
                    error: None,
                },
                Err(e) => AgentStatus {
                    name: reg.name.clone(),
                    target: reg.endpoint.target(),
                    healthy: false,
                    agent_type: None,
                    error: Some(e.to_string()),
                },
            }
        });
        join_all(probes).await
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers after `delay` with a fixed text.
    struct ScriptedEndpoint {
        text: &'static str,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl ScriptedEndpoint {
        fn new(text: &'static str, delay_ms: u64) -> Arc<Self> {
            Arc::new(Self {
                text,
                delay: Duration::from_millis(delay_ms),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AgentEndpoint for ScriptedEndpoint {
        fn target(&self) -> String {
            format!("scripted:{}", self.text)
        }
        async fn dispatch(&self, _note: &Note) -> Result<AgentResult, DispatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(AgentResult::text(self.text))
        }
        async fn probe(&self) -> Result<AgentHealth, DispatchError> {
            Ok(AgentHealth::healthy("ScriptedAgent"))
        }
    }

    /// Always fails with a transport error.
    struct DownEndpoint;

    #[async_trait]
    impl AgentEndpoint for DownEndpoint {
        fn target(&self) -> String {
            "down".into()
        }
        async fn dispatch(&self, _note: &Note) -> Result<AgentResult, DispatchError> {
            Err(DispatchError::Network("connection refused".into()))
        }
        async fn probe(&self) -> Result<AgentHealth, DispatchError> {
            Err(DispatchError::Network("connection refused".into()))
        }
    }

    /// Echoes the note it received, to observe normalization.
    struct EchoEndpoint;

    #[async_trait]
    impl AgentEndpoint for EchoEndpoint {
        fn target(&self) -> String {
            "echo".into()
        }
        async fn dispatch(&self, note: &Note) -> Result<AgentResult, DispatchError> {
            Ok(AgentResult::text(note.as_str()))
        }
        async fn probe(&self) -> Result<AgentHealth, DispatchError> {
            Ok(AgentHealth::healthy("EchoAgent"))
        }
    }

    const TIMEOUT: Duration = Duration::from_millis(100);

    #[tokio::test(start_paused = true)]
    async fn one_timeout_out_of_four_keeps_three_in_order() {
        let coordinator = Coordinator::new()
            .register("patient_info", ScriptedEndpoint::new("p", 30), TIMEOUT)
            .register("diagnostic", ScriptedEndpoint::new("d", 500), TIMEOUT)
            .register("medication", ScriptedEndpoint::new("m", 5), TIMEOUT)
            .register("referral_diet", ScriptedEndpoint::new("r", 60), TIMEOUT);

        let replies = coordinator.analyze("Symptoms: cough").await.unwrap();

        let names: Vec<&str> = replies.iter().map(|r| r.agent_name.as_str()).collect();
        assert_eq!(names, vec!["patient_info", "medication", "referral_diet"]);
        let texts: Vec<&str> = replies.iter().map(|r| r.response.as_text()).collect();
        assert_eq!(texts, vec!["p", "m", "r"]);
    }

    #[tokio::test(start_paused = true)]
    async fn all_failing_is_single_unavailable_error() {
        let coordinator = Coordinator::new()
            .register("a", Arc::new(DownEndpoint), TIMEOUT)
            .register("b", ScriptedEndpoint::new("late", 1_000), TIMEOUT)
            .register("c", Arc::new(DownEndpoint), TIMEOUT)
            .register("d", Arc::new(DownEndpoint), TIMEOUT);

        let err = coordinator.analyze("Symptoms: cough").await.unwrap_err();
        assert!(matches!(err, CoordinatorError::NoAgentsAvailable { attempted: 4 }));
    }

    #[tokio::test(start_paused = true)]
    async fn agents_are_called_concurrently() {
        let endpoints: Vec<Arc<ScriptedEndpoint>> =
            (0..4).map(|_| ScriptedEndpoint::new("ok", 80)).collect();
        let coordinator = endpoints
            .iter()
            .enumerate()
            .fold(Coordinator::new(), |c, (i, e)| {
                c.register(format!("agent-{i}"), e.clone(), TIMEOUT)
            });

        let started = tokio::time::Instant::now();
        let replies = coordinator.analyze("x").await.unwrap();

        assert_eq!(replies.len(), 4);
        // sequential calls would take 320ms; each is bounded by the 100ms timeout
        assert!(started.elapsed() < Duration::from_millis(100));
        assert!(endpoints.iter().all(|e| e.calls.load(Ordering::SeqCst) == 1));
    }

    #[tokio::test]
    async fn dispatch_all_reports_each_failure_kind() {
        let coordinator = Coordinator::new()
            .register("down", Arc::new(DownEndpoint), TIMEOUT)
            .register("slow", ScriptedEndpoint::new("late", 1_000), Duration::from_millis(10));

        let outcomes = coordinator.dispatch_all(&Note::new("x")).await;
        assert!(matches!(outcomes[0].result, Err(DispatchError::Network(_))));
        match &outcomes[1].result {
            Err(e) => assert!(e.is_timeout()),
            Ok(_) => panic!("slow agent should time out"),
        }
    }

    #[tokio::test]
    async fn note_is_normalized_before_dispatch() {
        let coordinator = Coordinator::with_registrations(vec![Registration {
            name: "echo".into(),
            endpoint: Arc::new(EchoEndpoint),
            timeout: TIMEOUT,
        }]);
        let replies = coordinator.analyze("  Name: Ann\\nAge: 30 ").await.unwrap();
        assert_eq!(replies[0].response.as_text(), "Name: Ann\nAge: 30");
    }

    #[tokio::test]
    async fn local_coordinator_runs_every_configured_agent() {
        let coordinator = Coordinator::local(&AppConfig::default());
        assert_eq!(
            coordinator.agent_names(),
            vec!["patient_info", "diagnostic", "medication", "referral_diet"]
        );

        let replies = coordinator
            .analyze("Name: Jane\\nSymptoms: chest pain, shortness of breath")
            .await
            .unwrap();
        assert_eq!(replies.len(), 4);
        assert!(replies[0].response.as_text().starts_with("Patient Summary:"));
        assert!(replies[1].response.as_text().contains("cardiovascular"));
        assert!(replies[3].response.as_text().contains("Cardiologist"));
    }

    #[tokio::test]
    async fn probe_all_marks_unreachable_agents() {
        let coordinator = Coordinator::new()
            .register("echo", Arc::new(EchoEndpoint), TIMEOUT)
            .register("down", Arc::new(DownEndpoint), TIMEOUT);

        let statuses = coordinator.probe_all().await;
        assert!(statuses[0].healthy);
        assert_eq!(statuses[0].agent_type.as_deref(), Some("EchoAgent"));
        assert!(!statuses[1].healthy);
        assert!(statuses[1].error.as_deref().unwrap().contains("connection refused"));
    }
}
