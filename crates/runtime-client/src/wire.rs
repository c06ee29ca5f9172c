//! Request/response payloads for the runtime HTTP API.

use serde::{Deserialize, Serialize};

use repolens_core::AgentSpec;

/// Body of `POST /v1/sessions`.
#[derive(Debug, Serialize)]
pub struct SessionCreateRequest<'a> {
    pub agents: Vec<&'a AgentSpec>,
    pub allowed_tools: &'a [String],
}

/// Response of `POST /v1/sessions`.
#[derive(Debug, Deserialize)]
pub struct SessionCreated {
    pub id: String,
}

/// Body of `POST /v1/sessions/{id}/messages`.
#[derive(Debug, Serialize)]
pub struct InstructionRequest<'a> {
    pub agent: &'a str,
    pub instruction: &'a str,
}
