//! `triage serve` — Run every agent service plus the coordinator.

use triage_config::AppConfig;

use super::CommandResult;

pub async fn run() -> CommandResult {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🩺 Triage — all services");
    for agent in &config.agents {
        println!("   {:<14} {}", agent.name, agent.url);
    }
    println!(
        "   {:<14} http://{}:{}/analyze",
        "coordinator", config.coordinator.host, config.coordinator.port
    );

    triage_gateway::start_all(config).await
}
