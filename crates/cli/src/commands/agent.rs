//! `triage agent <kind>` — Serve one agent behind its HTTP wrapper.

use triage_config::{AgentEndpointConfig, AppConfig};
use triage_core::AgentKind;

use super::CommandResult;

pub async fn run(kind: AgentKind, port_override: Option<u16>) -> CommandResult {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // the listen port comes from the URL the coordinator will call
    let port = match port_override {
        Some(port) => port,
        None => config
            .agent_of_kind(kind)
            .and_then(AgentEndpointConfig::port)
            .unwrap_or_else(|| kind.default_port()),
    };
    let host = config.agent_service.host.clone();

    println!("🩺 Triage Agent: {}", kind.type_name());
    println!("   Listening: {host}:{port}");
    println!("   Endpoints: GET /health, POST /a2a");

    triage_gateway::start_agent(kind, &host, port).await
}
