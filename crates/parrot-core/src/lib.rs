//! Core domain types for the parrot echo service.
//!
//! This crate provides the types shared across the service:
//!
//! - [`Agent`] — the synchronous agent contract
//! - [`EchoAgent`] — the built-in echo implementation
//! - [`InferenceResult`] — the structured result of a single run
//! - [`AgentRegistry`] — name-keyed registry of constructed agents
//!
//! # Example
//!
//! ```rust
//! use parrot_core::{Agent, EchoAgent};
//!
//! let agent = EchoAgent::default();
//! let result = agent.run("hello");
//!
//! assert_eq!(result.output, "ECHO_PY: hello");
//! assert_eq!(result.len, 5);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of characters echoed back in [`InferenceResult::output`].
///
/// Prompts may be arbitrarily long; only the first `MAX_ECHO_CHARS`
/// characters appear in the echo. [`InferenceResult::len`] always reports
/// the untruncated length.
pub const MAX_ECHO_CHARS: usize = 1024;

/// Name of the agent registered by [`AgentRegistry::with_defaults`].
pub const DEFAULT_AGENT: &str = "py-example";

/// Errors that can occur when resolving agents.
#[derive(Error, Debug)]
pub enum AgentError {
    /// No agent registered under the given name.
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),
}

/// The structured result of running an agent on a prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Name of the agent that produced this result.
    pub agent: String,
    /// The full prompt as submitted.
    pub input: String,
    /// The prefixed echo, truncated to [`MAX_ECHO_CHARS`] characters.
    pub output: String,
    /// Character count of the untruncated prompt.
    pub len: usize,
}

/// Contract for agents that process a text prompt.
///
/// Agents are synchronous by construction: `run` is deterministic, pure,
/// and cannot fail. The empty string is valid input and produces an empty
/// echo.
pub trait Agent: Send + Sync + std::fmt::Debug {
    /// Returns the name of this agent.
    fn name(&self) -> &str;

    /// Processes the prompt and returns the structured result.
    fn run(&self, prompt: &str) -> InferenceResult;
}

/// The built-in echo agent.
///
/// Maps a prompt to `ECHO_<prefix>: <prompt>`, truncating the echoed text
/// to the first [`MAX_ECHO_CHARS`] characters.
#[derive(Debug, Clone)]
pub struct EchoAgent {
    name: String,
    prefix: String,
}

impl EchoAgent {
    /// Creates an echo agent with the given name and echo prefix.
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self { name: name.into(), prefix: prefix.into() }
    }
}

impl Default for EchoAgent {
    fn default() -> Self {
        Self::new(DEFAULT_AGENT, "PY")
    }
}

impl Agent for EchoAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, prompt: &str) -> InferenceResult {
        // Truncation counts characters, not bytes, so a multibyte
        // character is never split.
        let echoed: String = prompt.chars().take(MAX_ECHO_CHARS).collect();
        InferenceResult {
            agent: self.name.clone(),
            input: prompt.to_string(),
            output: format!("ECHO_{}: {}", self.prefix, echoed),
            len: prompt.chars().count(),
        }
    }
}

/// Name-keyed registry of constructed agents.
///
/// Agents are registered once at startup and shared across requests; they
/// are stateless, so sharing needs no locking.
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl AgentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { agents: HashMap::new() }
    }

    /// Creates a registry with the built-in agents registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(EchoAgent::default()));
        registry
    }

    /// Registers an agent under its own name, replacing any previous entry.
    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        self.agents.insert(agent.name().to_string(), agent);
    }

    /// Looks up an agent by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Agent>, AgentError> {
        self.agents
            .get(name)
            .cloned()
            .ok_or_else(|| AgentError::UnknownAgent(name.to_string()))
    }

    /// Returns the registered agent names, sorted for stable output.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.agents.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
