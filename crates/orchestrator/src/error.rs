use std::path::PathBuf;

use repolens_core::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Invalid run stage transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Failed to create output structure at {path}: {source}")]
    StructureCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Malformed agent record '{name}': {reason}")]
    MalformedAgent { name: String, reason: String },

    #[error("Phase '{phase}' failed: {reason}")]
    PhaseExecution { phase: String, reason: String },

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Orchestrator not registered: {0}")]
    NotRegistered(String),

    #[error("Delegation to '{callee}' failed: {reason}")]
    Delegation { callee: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrchestratorError {
    /// Create a structure creation error.
    pub fn structure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StructureCreation {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed agent record error.
    pub fn malformed_agent(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::MalformedAgent {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a phase execution error.
    pub fn phase_failed(phase: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::PhaseExecution {
            phase: phase.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
