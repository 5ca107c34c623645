//! Coordinator API.
//!
//! - `GET  /health`  → service status with uptime
//! - `POST /analyze` → one reply per agent that answered, in registration order
//! - `GET  /agents`  → registered agents and their health probes

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use triage_coordinator::{AgentStatus, Coordinator};
use triage_core::AgentReply;

use crate::with_http_layers;

/// Body returned when no agent could answer.
pub const UNAVAILABLE_DETAIL: &str = "All agent services are unavailable";

pub struct CoordinatorState {
    pub coordinator: Coordinator,
    pub start_time: chrono::DateTime<chrono::Utc>,
}

pub type SharedCoordinatorState = Arc<CoordinatorState>;

/// Router serving the coordinator API on top of `coordinator`.
pub fn coordinator_router(coordinator: Coordinator) -> Router {
    let state = Arc::new(CoordinatorState {
        coordinator,
        start_time: chrono::Utc::now(),
    });
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/analyze", post(analyze_handler))
        .route("/agents", get(agents_handler))
        .with_state(state);
    with_http_layers(router)
}

#[derive(Serialize, Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
}

async fn health_handler(State(state): State<SharedCoordinatorState>) -> Json<HealthResponse> {
    let uptime = chrono::Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_secs: uptime,
    })
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: String,
}

#[derive(Serialize)]
struct DetailResponse {
    detail: String,
}

async fn analyze_handler(
    State(state): State<SharedCoordinatorState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<Vec<AgentReply>>, (StatusCode, Json<DetailResponse>)> {
    match state.coordinator.analyze(&payload.text).await {
        Ok(replies) => Ok(Json(replies)),
        Err(e) => {
            warn!(error = %e, "Analysis failed");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(DetailResponse {
                    detail: UNAVAILABLE_DETAIL.into(),
                }),
            ))
        }
    }
}

#[derive(Serialize)]
struct AgentListResponse {
    agents: Vec<AgentStatus>,
    healthy: usize,
    total: usize,
}

async fn agents_handler(State(state): State<SharedCoordinatorState>) -> Json<AgentListResponse> {
    let agents = state.coordinator.probe_all().await;
    Json(AgentListResponse {
        healthy: agents.iter().filter(|a| a.healthy).count(),
        total: agents.len(),
        agents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;
    use triage_config::AppConfig;
    use triage_coordinator::AgentEndpoint;
    use triage_core::{AgentHealth, AgentResult, DispatchError, Note};

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

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
    }

    fn post_analyze(text: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "text": text }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_version_and_uptime() {
        let app = coordinator_router(Coordinator::new());
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, json) = call(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert!(json["uptime_secs"].is_u64());
    }

    #[tokio::test]
    async fn analyze_returns_one_reply_per_agent() {
        let app = coordinator_router(Coordinator::local(&AppConfig::default()));
        let (status, json) = call(
            app,
            post_analyze("Patient Name: John\\nAge: 52\\nSymptoms: headache, nausea"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let replies = json.as_array().unwrap();
        let names: Vec<&str> = replies
            .iter()
            .map(|r| r["agent_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["patient_info", "diagnostic", "medication", "referral_diet"]);
        assert_eq!(replies[1]["response"]["content"]["type"], "text");
        assert!(
            replies[1]["response"]["content"]["text"]
                .as_str()
                .unwrap()
                .contains("Multiple conditions possible")
        );
    }

    #[tokio::test]
    async fn partial_failure_drops_only_the_failed_agent() {
        let config = AppConfig::default();
        let coordinator = Coordinator::local(&config).register(
            "offline",
            Arc::new(DownEndpoint),
            Duration::from_secs(1),
        );
        let app = coordinator_router(coordinator);

        let (status, json) = call(app, post_analyze("Symptoms: rash")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 4);
        assert!(!json.to_string().contains("offline"));
    }

    #[tokio::test]
    async fn all_agents_down_is_service_unavailable() {
        let coordinator = Coordinator::new()
            .register("a", Arc::new(DownEndpoint), Duration::from_secs(1))
            .register("b", Arc::new(DownEndpoint), Duration::from_secs(1));
        let app = coordinator_router(coordinator);

        let (status, json) = call(app, post_analyze("Symptoms: cough")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["detail"], UNAVAILABLE_DETAIL);
    }

    #[tokio::test]
    async fn agents_lists_probe_results() {
        let coordinator = Coordinator::local(&AppConfig::default()).register(
            "offline",
            Arc::new(DownEndpoint),
            Duration::from_secs(1),
        );
        let app = coordinator_router(coordinator);
        let req = Request::builder().uri("/agents").body(Body::empty()).unwrap();

        let (status, json) = call(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 5);
        assert_eq!(json["healthy"], 4);
        assert_eq!(json["agents"][0]["agent_type"], "PatientDataAgent");
        assert_eq!(json["agents"][4]["healthy"], false);
    }
}
