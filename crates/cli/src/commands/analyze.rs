//! `triage analyze` — Run one note through every agent and print the replies.

use std::path::PathBuf;

use triage_config::AppConfig;
use triage_coordinator::Coordinator;

use super::CommandResult;

pub async fn run(
    text: Option<String>,
    file: Option<PathBuf>,
    local: bool,
    json: bool,
) -> CommandResult {
    let note = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
        (None, None) => return Err("Provide a note with --text or --file".into()),
    };

    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let coordinator = if local {
        Coordinator::local(&config)
    } else {
        Coordinator::from_config(&config)?
    };

    let replies = coordinator.analyze(&note).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&replies)?);
        return Ok(());
    }

    for reply in &replies {
        println!("━━━ {} ━━━", reply.agent_name);
        println!("{}\n", reply.response.as_text());
    }
    if replies.len() < coordinator.len() {
        println!(
            "⚠️  {} of {} agents did not answer (see log for details)",
            coordinator.len() - replies.len(),
            coordinator.len()
        );
    }

    Ok(())
}
