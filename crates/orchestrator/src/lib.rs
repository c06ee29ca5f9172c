//! Phase orchestration engine for multi-step analysis workflows.
//!
//! An [`Orchestrator`] drives a named domain's phase sequence end-to-end:
//! it creates the output structure, assembles the run's capability set
//! (agents + allowed tools), opens one execution session bound to that
//! set, runs the workflow's phases strictly in order, tracks cost and
//! completion, verifies declared artifacts, and tears the session down on
//! every exit path.
//!
//! Concrete workflows are declarative instantiations of this engine: they
//! implement [`Workflow`] and call [`PhaseDriver::execute_phase`] once per
//! phase.

pub mod accounting;
pub mod catalog;
pub mod emitter;
pub mod error;
pub mod guard;
pub mod registry;
pub mod runner;
pub mod stage;

pub use accounting::RunState;
pub use catalog::AgentCatalog;
pub use emitter::RunEventEmitter;
pub use error::{OrchestratorError, Result};
pub use guard::RunGuard;
pub use registry::{DelegationContext, OrchestratorRegistry, PhaseDelegate};
pub use runner::{Orchestrator, OrchestratorConfig, PhaseDriver, RunOutcome, Workflow};
pub use stage::{RunLifecycle, RunStage};
