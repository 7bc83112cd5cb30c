//! Direct inference HTTP handler.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use tracing::info;

use parrot_core::{Agent, InferenceResult};

use crate::dto::InferRequest;
use crate::error::AppError;
use crate::ServerState;

/// Runs the default agent on the submitted prompt.
///
/// The `prompt` field is required; a missing or malformed body is a
/// validation error, surfaced through the [`JsonRejection`] mapping.
pub async fn infer(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<InferRequest>, JsonRejection>,
) -> Result<Json<InferenceResult>, AppError> {
    let Json(req) = payload?;
    let result = state.default_agent.run(&req.prompt);
    info!("Ran agent {} on {} chars", result.agent, result.len);
    Ok(Json(result))
}
