//! Triage CLI — the main entry point.
//!
//! Commands:
//! - `agent`        — Serve one agent behind its HTTP wrapper
//! - `coordinator`  — Serve the coordinator API
//! - `serve`        — Run every agent service plus the coordinator
//! - `analyze`      — Run one note through all agents and print the replies
//! - `status`       — Show effective configuration
//! - `doctor`       — Validate config and probe agent health
//! - `onboard`      — Write a default config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use triage_core::AgentKind;

mod commands;

#[derive(Parser)]
#[command(
    name = "triage",
    about = "Triage — rule-based clinical note agents behind a fan-out coordinator",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a single agent (patient_data, diagnostic, medication, referral_diet)
    Agent {
        kind: AgentKind,

        /// Override the port (defaults to the port in the agent's configured URL)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Serve the coordinator API
    Coordinator {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Start all agent services and the coordinator in one process
    Serve,

    /// Analyze one clinical note
    Analyze {
        /// Note text (literal `\n` sequences are treated as line breaks)
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Read the note from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Run the agents in-process instead of calling their services
        #[arg(long)]
        local: bool,

        /// Print the raw JSON replies
        #[arg(long)]
        json: bool,
    },

    /// Show effective configuration
    Status,

    /// Validate configuration and probe every agent
    Doctor,

    /// Write a default configuration file
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    match cli.command {
        Commands::Agent { kind, port } => commands::agent::run(kind, port).await?,
        Commands::Coordinator { port } => commands::coordinator::run(port).await?,
        Commands::Serve => commands::serve::run().await?,
        Commands::Analyze {
            text,
            file,
            local,
            json,
        } => commands::analyze::run(text, file, local, json).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Onboard => commands::onboard::run().await?,
    }

    Ok(())
}
