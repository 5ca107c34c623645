//! `triage coordinator` — Serve the coordinator API.

use triage_config::AppConfig;

use super::CommandResult;

pub async fn run(port_override: Option<u16>) -> CommandResult {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.coordinator.port = port;
    }

    println!("🩺 Triage Coordinator");
    println!("   Listening: {}:{}", config.coordinator.host, config.coordinator.port);
    for agent in &config.agents {
        println!(
            "   → {:<14} {} (timeout {}s)",
            agent.name,
            agent.url,
            config.agent_timeout(agent).as_secs()
        );
    }

    triage_gateway::start_coordinator(config).await
}
