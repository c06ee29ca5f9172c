//! Execution session contract between the engine and an agent runtime.
//!
//! The orchestration engine never talks to a runtime directly; it drives
//! an [`ExecutionSession`] obtained from a [`SessionFactory`] and consumes
//! the [`ResponseEvent`] stream each instruction produces. A stream is
//! finite: the runtime terminates it by yielding a
//! [`ResponseEvent::PhaseResult`].

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capability::CapabilitySet;

/// One event observed while a phase is executing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseEvent {
    /// Text produced by the agent.
    Text { text: String },
    /// The agent invoked a tool.
    ToolInvocation {
        tool_name: String,
        #[serde(default)]
        tool_input: serde_json::Value,
    },
    /// A tool returned a result to the agent.
    ToolResult {
        #[serde(default)]
        content: Option<String>,
    },
    /// Terminal event carrying the phase's cost and reported outcome.
    PhaseResult { cost_usd: f64, success: bool },
}

impl ResponseEvent {
    /// Whether this event terminates the phase's stream.
    pub fn is_result(&self) -> bool {
        matches!(self, ResponseEvent::PhaseResult { .. })
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Session is closed")]
    Closed,
}

pub type EventStream<'a> = BoxStream<'a, Result<ResponseEvent, SessionError>>;

/// A live connection to the underlying agent runtime, bound to a fixed
/// capability set for the duration of one run.
///
/// Exclusively owned by one orchestrator; `close` must be called on every
/// exit path and the session must not be reused afterwards.
#[async_trait]
pub trait ExecutionSession: Send {
    /// Send an instruction addressed to a named agent.
    async fn send(&mut self, agent_name: &str, instruction: &str) -> Result<(), SessionError>;

    /// The event sequence correlated to the most recent `send`.
    fn events(&mut self) -> EventStream<'_>;

    /// Release the session.
    async fn close(&mut self) -> Result<(), SessionError>;
}

/// Opens execution sessions bound to a capability set.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(
        &self,
        capabilities: &CapabilitySet,
    ) -> Result<Box<dyn ExecutionSession>, SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tagging() {
        let event: ResponseEvent =
            serde_json::from_str(r#"{"type": "text", "text": "hello"}"#).unwrap();
        assert!(matches!(event, ResponseEvent::Text { ref text } if text == "hello"));

        let event: ResponseEvent = serde_json::from_str(
            r#"{"type": "tool_invocation", "tool_name": "Read", "tool_input": {"file_path": "a.rs"}}"#,
        )
        .unwrap();
        assert!(matches!(event, ResponseEvent::ToolInvocation { ref tool_name, .. } if tool_name == "Read"));
    }

    #[test]
    fn test_result_terminates() {
        let event: ResponseEvent =
            serde_json::from_str(r#"{"type": "phase_result", "cost_usd": 0.25, "success": true}"#)
                .unwrap();
        assert!(event.is_result());
        assert!(!ResponseEvent::Text {
            text: String::new()
        }
        .is_result());
    }

    #[test]
    fn test_tool_result_content_optional() {
        let event: ResponseEvent = serde_json::from_str(r#"{"type": "tool_result"}"#).unwrap();
        assert!(matches!(event, ResponseEvent::ToolResult { content: None }));
    }
}
