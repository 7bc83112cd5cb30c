//! HTTP route handlers for the echo agent server.

pub mod agent;
pub mod infer;

use axum::Json;

/// Health check endpoint.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
