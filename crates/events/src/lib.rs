//! Event system for repolens
//!
//! This crate provides the event bus and the run/phase lifecycle event
//! types. The orchestration engine publishes every observable step of a
//! run here; display frontends subscribe instead of being called back
//! directly.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::*;
