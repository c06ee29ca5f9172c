//! Declarative workflow instantiations of the orchestration engine.
//!
//! Each workflow here is a list of agents, prompts, and declared output
//! paths; all lifecycle semantics (session scoping, cost tracking,
//! verification, teardown) live in the `orchestrator` crate.

mod architecture;
mod prompts;
mod review;
mod ux;

pub use architecture::ArchitectureWorkflow;
pub use review::{ArtifactIndexDelegate, ReviewWorkflow};
pub use ux::UxWorkflow;
