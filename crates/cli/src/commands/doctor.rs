//! `triage doctor` — Validate configuration and probe agent health.

use triage_config::AppConfig;
use triage_coordinator::Coordinator;

use super::CommandResult;

pub async fn run() -> CommandResult {
    println!("🩺 Triage Doctor — System Diagnostics");
    println!("=====================================\n");

    let mut issues = 0;

    let config = match AppConfig::load() {
        Ok(config) => {
            if AppConfig::resolved_path().exists() {
                println!("  ✅ Config file valid");
            } else {
                println!("  ⚠️  No config file, using defaults — run `triage onboard`");
                issues += 1;
            }
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 issue found. Fix the config and re-run.");
            return Ok(());
        }
    };

    let coordinator = Coordinator::from_config(&config)?;
    for status in coordinator.probe_all().await {
        if status.healthy {
            println!(
                "  ✅ {:<14} {} ({})",
                status.name,
                status.target,
                status.agent_type.unwrap_or_default()
            );
        } else {
            println!(
                "  ❌ {:<14} {} — {}",
                status.name,
                status.target,
                status.error.unwrap_or_else(|| "unhealthy".into())
            );
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
