//! Event types for the repolens event system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping all events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: Event,
}

impl EventEnvelope {
    /// Create a new event envelope with auto-generated ID and timestamp
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// All observable steps of an orchestrator run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A run began; the output directory already exists
    #[serde(rename = "run.started")]
    RunStarted { domain: String, output_dir: String },

    /// A run finished and produced its summary
    #[serde(rename = "run.completed")]
    RunCompleted {
        domain: String,
        output_dir: String,
        completed_phases: usize,
        total_cost_usd: f64,
    },

    /// A run aborted before producing a summary
    #[serde(rename = "run.failed")]
    RunFailed { domain: String, error: String },

    /// An instruction was dispatched to an agent
    #[serde(rename = "phase.started")]
    PhaseStarted {
        domain: String,
        phase: String,
        agent: String,
    },

    /// A phase's result event was observed
    #[serde(rename = "phase.completed")]
    PhaseCompleted {
        domain: String,
        phase: String,
        cost_usd: f64,
        success: bool,
    },

    /// Text streamed from the agent mid-phase
    #[serde(rename = "agent.text")]
    AgentText { phase: String, text: String },

    /// The agent invoked a tool
    #[serde(rename = "tool.invoked")]
    ToolInvoked {
        phase: String,
        tool_name: String,
        /// Rendered input summary (truncated if large)
        input: Option<String>,
    },

    /// A tool returned a result to the agent
    #[serde(rename = "tool.result")]
    ToolResult {
        phase: String,
        content: Option<String>,
    },

    /// One declared output artifact was checked after the run
    #[serde(rename = "output.checked")]
    OutputChecked {
        path: String,
        exists: bool,
        size_bytes: Option<u64>,
    },

    /// One orchestrator delegated a phase to another
    #[serde(rename = "delegation.invoked")]
    DelegationInvoked {
        caller: String,
        callee: String,
        phase: String,
    },

    /// Generic error event
    #[serde(rename = "error")]
    Error {
        message: String,
        context: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_ids_unique() {
        let a = EventEnvelope::new(Event::RunStarted {
            domain: "architecture".to_string(),
            output_dir: "out".to_string(),
        });
        let b = EventEnvelope::new(Event::RunStarted {
            domain: "architecture".to_string(),
            output_dir: "out".to_string(),
        });
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_event_serialization_tag() {
        let event = Event::PhaseCompleted {
            domain: "ux".to_string(),
            phase: "Heuristics Audit".to_string(),
            cost_usd: 0.25,
            success: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "phase.completed");
        assert_eq!(json["cost_usd"], 0.25);
    }

    #[test]
    fn test_event_round_trip() {
        let event = Event::ToolInvoked {
            phase: "Component Inventory".to_string(),
            tool_name: "Read".to_string(),
            input: Some("src/lib.rs".to_string()),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, Event::ToolInvoked { ref tool_name, .. } if tool_name == "Read"));
    }
}
