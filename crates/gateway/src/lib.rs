//! HTTP gateway for the triage services.
//!
//! Two kinds of service live here:
//! - [`agent_service`]: one agent behind `/health` and `/a2a`
//! - [`coordinator_api`]: the fan-out coordinator behind `/health`,
//!   `/analyze`, and `/agents`
//!
//! Built on Axum. Every router gets permissive CORS and HTTP trace logging.

pub mod agent_service;
pub mod coordinator_api;

use axum::Router;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use triage_config::AppConfig;
use triage_coordinator::Coordinator;
use triage_core::AgentKind;

pub use agent_service::agent_router;
pub use coordinator_api::coordinator_router;

type ServeResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}

pub(crate) fn with_http_layers(router: Router) -> Router {
    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve `app` on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, app: Router) -> ServeResult {
    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the service wrapper for one agent kind.
pub async fn start_agent(kind: AgentKind, host: &str, port: u16) -> ServeResult {
    let addr = format!("{host}:{port}");
    let app = agent_router(triage_agents::build_agent(kind));

    let listener = TcpListener::bind(&addr).await?;
    info!(agent = %kind, addr = %addr, "Agent service starting");
    serve(listener, app).await
}

/// Start the coordinator API, reaching agents over HTTP.
pub async fn start_coordinator(config: AppConfig) -> ServeResult {
    let coordinator = Coordinator::from_config(&config)?;
    start_coordinator_with(&config, coordinator).await
}

/// Start the coordinator API around an already built coordinator.
pub async fn start_coordinator_with(config: &AppConfig, coordinator: Coordinator) -> ServeResult {
    let addr = format!("{}:{}", config.coordinator.host, config.coordinator.port);
    let agents = coordinator.agent_names().join(", ");
    let app = coordinator_router(coordinator);

    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, agents = %agents, "Coordinator starting");
    serve(listener, app).await
}

/// Start every configured agent service plus the coordinator in one
/// process. Returns when any of them stops.
pub async fn start_all(config: AppConfig) -> ServeResult {
    let mut services = tokio::task::JoinSet::new();

    for agent in &config.agents {
        let Some(port) = agent.port() else {
            return Err(format!("agent '{}' has no usable port in '{}'", agent.name, agent.url).into());
        };
        let kind = agent.kind;
        let host = config.agent_service.host.clone();
        services.spawn(async move { start_agent(kind, &host, port).await });
    }

    let coordinator_config = config.clone();
    services.spawn(async move { start_coordinator(coordinator_config).await });

    match services.join_next().await {
        Some(Ok(result)) => result,
        Some(Err(e)) => Err(e.into()),
        None => Ok(()),
    }
}
