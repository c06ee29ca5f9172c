//! HTTP client for the repolens agent runtime.
//!
//! Implements the [`repolens_core::ExecutionSession`] contract over a
//! remote runtime server: sessions are created with a fixed capability
//! set, instructions are dispatched per phase, and the phase's response
//! events arrive as a server-sent event stream decoded into
//! [`repolens_core::ResponseEvent`].

mod session;
mod wire;

pub use session::{RuntimeSession, RuntimeSessionFactory, DEFAULT_BASE_URL};
