//! RAII guard for run lifecycle.
//!
//! When the guard is dropped without being marked as completed, it emits
//! a run-failed event, so observers learn about aborts even when the run
//! body panicked or returned early.

use tracing::{debug, warn};

use events::Event;

use crate::emitter::RunEventEmitter;

pub struct RunGuard {
    domain: String,
    emitter: RunEventEmitter,
    completed: bool,
}

impl RunGuard {
    pub fn new(domain: impl Into<String>, emitter: RunEventEmitter) -> Self {
        let domain = domain.into();
        debug!(domain = %domain, "Run guard created");
        Self {
            domain,
            emitter,
            completed: false,
        }
    }

    /// Mark the run as completed successfully.
    ///
    /// Prevents the guard from emitting a failure event on drop.
    pub fn mark_completed(&mut self) {
        debug!(domain = %self.domain, "Run marked as completed");
        self.completed = true;
    }

    /// Mark the run as failed with an error.
    ///
    /// Emits the failure event immediately and disarms the drop path.
    pub fn mark_failed(&mut self, error: &str) {
        debug!(domain = %self.domain, error = %error, "Run marked as failed");
        self.emit_failure(error);
        self.completed = true;
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn emit_failure(&self, error: &str) {
        self.emitter.emit(Event::RunFailed {
            domain: self.domain.clone(),
            error: error.to_string(),
        });
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.completed {
            warn!(
                domain = %self.domain,
                "Run guard dropped without completion - emitting failure"
            );
            self.emit_failure("run terminated unexpectedly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use events::EventBus;

    #[test]
    fn test_guard_initial_state() {
        let guard = RunGuard::new("architecture", RunEventEmitter::new(EventBus::new(), true));
        assert!(!guard.is_completed());
    }

    #[test]
    fn test_guard_mark_completed_silences_drop() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let mut guard = RunGuard::new("architecture", RunEventEmitter::new(bus, true));

        guard.mark_completed();
        drop(guard);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_guard_drop_emits_failure() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let guard = RunGuard::new("architecture", RunEventEmitter::new(bus, true));

        drop(guard);

        let envelope = rx.try_recv().unwrap();
        assert!(matches!(envelope.event, Event::RunFailed { ref domain, .. } if domain == "architecture"));
    }

    #[test]
    fn test_guard_mark_failed_emits_once() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let mut guard = RunGuard::new("ux", RunEventEmitter::new(bus, true));

        guard.mark_failed("session dropped");
        drop(guard);

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
