//! Agent registry HTTP handlers (run/list).

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;

use parrot_core::Agent;

use crate::dto::AgentRunResponse;
use crate::error::AppError;
use crate::ServerState;

/// Runs an agent on an arbitrary JSON payload.
///
/// The `prompt` key supplies the input, defaulting to the empty string when
/// absent or not a string. An optional `agent` key selects a registered
/// agent by name; unknown names are a 404.
pub async fn run(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<AgentRunResponse>, AppError> {
    let agent = match payload.get("agent").and_then(|v| v.as_str()) {
        Some(name) => state.registry.get(name)?,
        None => state.default_agent.clone(),
    };

    let prompt = payload.get("prompt").and_then(|v| v.as_str()).unwrap_or("");
    let result = agent.run(prompt);
    info!("Ran agent {} on {} chars", result.agent, result.len);

    Ok(Json(AgentRunResponse {
        agent: agent.name().to_string(),
        result,
    }))
}

/// Lists the registered agent names.
pub async fn list(State(state): State<Arc<ServerState>>) -> Json<Vec<String>> {
    Json(state.registry.list())
}
