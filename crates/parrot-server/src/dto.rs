//! Data transfer objects for HTTP message serialization.

use parrot_core::InferenceResult;
use serde::{Deserialize, Serialize};

/// Request body for direct inference.
#[derive(Debug, Deserialize)]
pub struct InferRequest {
    pub prompt: String,
}

/// Response from running a named agent.
#[derive(Debug, Serialize)]
pub struct AgentRunResponse {
    pub agent: String,
    pub result: InferenceResult,
}
