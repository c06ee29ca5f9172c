//! Run event emitter with sequence guarantees.
//!
//! Forwarding response events to the bus is a display side effect only;
//! it never influences run state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use events::{Event, EventBus, EventEnvelope};
use repolens_core::ResponseEvent;

/// Longest tool-result excerpt forwarded for display.
const RESULT_EXCERPT_LEN: usize = 200;
/// Longest rendered tool-input summary.
const INPUT_EXCERPT_LEN: usize = 120;

/// Event emitter with sequence number guarantees.
///
/// Wraps an [`EventBus`] and stamps a monotonically increasing sequence
/// so ordering stays observable even with concurrent orchestrators on
/// one bus.
#[derive(Clone)]
pub struct RunEventEmitter {
    bus: EventBus,
    sequence: Arc<AtomicU64>,
    show_tool_details: bool,
}

impl RunEventEmitter {
    pub fn new(bus: EventBus, show_tool_details: bool) -> Self {
        Self {
            bus,
            sequence: Arc::new(AtomicU64::new(0)),
            show_tool_details,
        }
    }

    /// Emit an event with the next sequence number.
    pub fn emit(&self, event: Event) {
        let _seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.bus.publish(EventEnvelope::new(event));
    }

    /// Get the current sequence number (for debugging/testing).
    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Forward one mid-phase response event for display.
    ///
    /// Tool activity is suppressed when tool details are disabled; the
    /// terminal result event is not forwarded here (the runner emits
    /// `phase.completed` with the domain attached).
    pub fn forward_response(&self, phase: &str, event: &ResponseEvent) {
        match event {
            ResponseEvent::Text { text } => {
                self.emit(Event::AgentText {
                    phase: phase.to_string(),
                    text: text.clone(),
                });
            }
            ResponseEvent::ToolInvocation {
                tool_name,
                tool_input,
            } if self.show_tool_details => {
                self.emit(Event::ToolInvoked {
                    phase: phase.to_string(),
                    tool_name: tool_name.clone(),
                    input: render_tool_input(tool_input),
                });
            }
            ResponseEvent::ToolResult { content } if self.show_tool_details => {
                self.emit(Event::ToolResult {
                    phase: phase.to_string(),
                    content: content.as_deref().map(|c| excerpt(c, RESULT_EXCERPT_LEN)),
                });
            }
            _ => {}
        }
    }
}

/// Summarize tool input for display: surface the fields a reader cares
/// about (what file, what pattern, what command), fall back to compact
/// JSON.
fn render_tool_input(input: &serde_json::Value) -> Option<String> {
    if input.is_null() {
        return None;
    }

    let mut parts = Vec::new();
    for key in ["file_path", "pattern", "command"] {
        if let Some(value) = input.get(key).and_then(|v| v.as_str()) {
            parts.push(format!("{}: {}", key, value));
        }
    }
    if parts.is_empty() {
        return Some(excerpt(&input.to_string(), INPUT_EXCERPT_LEN));
    }
    Some(parts.join(", "))
}

fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}
