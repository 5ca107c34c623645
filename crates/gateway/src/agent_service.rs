//! HTTP wrapper around a single agent.
//!
//! Endpoints:
//! - `GET  /health` → `{"status":"healthy","agent_type":"<TypeName>"}`
//! - `POST /a2a`    → `{"content":{"type":"text","text":"..."}}`

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use triage_core::{Agent, AgentHealth, AgentRequest, AgentResult};

use crate::{ErrorResponse, with_http_layers};

/// State shared by one agent service's handlers.
#[derive(Clone)]
pub struct AgentServiceState {
    pub agent: Arc<dyn Agent>,
}

/// Router exposing `agent` over `/health` and `/a2a`.
pub fn agent_router(agent: Arc<dyn Agent>) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/a2a", post(handle_handler))
        .with_state(AgentServiceState { agent });
    with_http_layers(router)
}

async fn health_handler(State(state): State<AgentServiceState>) -> Json<AgentHealth> {
    Json(AgentHealth::healthy(state.agent.kind().type_name()))
}

async fn handle_handler(
    State(state): State<AgentServiceState>,
    Json(payload): Json<AgentRequest>,
) -> Result<Json<AgentResult>, (StatusCode, Json<ErrorResponse>)> {
    let Some(content) = payload.content else {
        warn!(agent = state.agent.name(), "Request without content rejected");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid request".into(),
            }),
        ));
    };

    debug!(agent = state.agent.name(), chars = content.text.len(), "Handling request");

    // Rule evaluation is CPU-bound; a panic here becomes a join error.
    let agent = state.agent.clone();
    match tokio::task::spawn_blocking(move || agent.handle_text(&content.text)).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            error!(agent = state.agent.name(), error = %e, "Agent failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Agent failed: {e}"),
                }),
            ))
        }
    }
}
