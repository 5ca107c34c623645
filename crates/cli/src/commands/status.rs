//! `triage status` — Show effective configuration.

use triage_config::AppConfig;

use super::CommandResult;

pub async fn run() -> CommandResult {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🩺 Triage Status");
    println!("================");
    println!("  Config file:   {}", AppConfig::resolved_path().display());
    println!("  Coordinator:   {}:{}", config.coordinator.host, config.coordinator.port);
    println!("  Agent host:    {}", config.agent_service.host);
    println!("  Timeout:       {}s (default)", config.coordinator.default_timeout_secs);
    println!("  Agents:");
    for agent in &config.agents {
        println!(
            "    {:<14} {:<14} {} ({}s)",
            agent.name,
            agent.kind,
            agent.url,
            config.agent_timeout(agent).as_secs()
        );
    }

    if AppConfig::resolved_path().exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file, using defaults — run `triage onboard` to write one");
    }

    Ok(())
}
