//! Shared domain types and contracts for the repolens workspace.
//!
//! This crate defines the vocabulary every other crate speaks:
//!
//! - [`AgentSpec`] - resolved capability record for one agent
//! - [`CapabilitySet`] - the fixed agent/tool binding of one run
//! - [`ResponseEvent`] / [`ExecutionSession`] - the runtime contract the
//!   orchestration engine consumes
//! - [`ToolProvider`] - availability and allowed-tool surface of an
//!   external tool integration
//! - [`RunSummary`] / [`VerificationReport`] - what a finished run reports

mod agent;
mod capability;
mod session;
mod summary;
mod tools;

pub use agent::{AgentSpec, DEFAULT_MODEL};
pub use capability::CapabilitySet;
pub use session::{EventStream, ExecutionSession, ResponseEvent, SessionError, SessionFactory};
pub use summary::{FileCheck, RunSummary, VerificationReport};
pub use tools::ToolProvider;
