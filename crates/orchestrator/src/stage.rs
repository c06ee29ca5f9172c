use crate::error::{OrchestratorError, Result};

/// Lifecycle stage of one orchestrator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Constructed,
    StructureReady,
    Running,
    Verifying,
    Summarized,
    TornDown,
    Failed,
}

impl RunStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constructed => "constructed",
            Self::StructureReady => "structure_ready",
            Self::Running => "running",
            Self::Verifying => "verifying",
            Self::Summarized => "summarized",
            Self::TornDown => "torn_down",
            Self::Failed => "failed",
        }
    }
}

pub struct RunLifecycle;

impl RunLifecycle {
    pub fn validate_transition(from: &RunStage, to: &RunStage) -> Result<()> {
        let allowed = Self::allowed_transitions(from);

        if allowed.contains(to) {
            Ok(())
        } else {
            Err(OrchestratorError::InvalidTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }

    fn allowed_transitions(from: &RunStage) -> Vec<RunStage> {
        match from {
            RunStage::Constructed => vec![RunStage::StructureReady],
            RunStage::StructureReady => vec![RunStage::Running],
            RunStage::Running => vec![RunStage::Verifying, RunStage::Failed],
            RunStage::Verifying => vec![RunStage::Summarized, RunStage::Failed],
            RunStage::Summarized => vec![RunStage::TornDown],
            RunStage::TornDown => vec![],
            RunStage::Failed => vec![RunStage::TornDown],
        }
    }

    pub fn can_transition(from: &RunStage, to: &RunStage) -> bool {
        Self::validate_transition(from, to).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(RunLifecycle::can_transition(
            &RunStage::Constructed,
            &RunStage::StructureReady
        ));
        assert!(RunLifecycle::can_transition(
            &RunStage::StructureReady,
            &RunStage::Running
        ));
        assert!(RunLifecycle::can_transition(
            &RunStage::Running,
            &RunStage::Verifying
        ));
        assert!(RunLifecycle::can_transition(
            &RunStage::Verifying,
            &RunStage::Summarized
        ));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!RunLifecycle::can_transition(
            &RunStage::Constructed,
            &RunStage::Running
        ));
        assert!(!RunLifecycle::can_transition(
            &RunStage::TornDown,
            &RunStage::Running
        ));
        assert!(!RunLifecycle::can_transition(
            &RunStage::Summarized,
            &RunStage::Failed
        ));
    }

    #[test]
    fn test_failure_reachable_from_running_and_verifying() {
        assert!(RunLifecycle::can_transition(
            &RunStage::Running,
            &RunStage::Failed
        ));
        assert!(RunLifecycle::can_transition(
            &RunStage::Verifying,
            &RunStage::Failed
        ));
        assert!(RunLifecycle::can_transition(
            &RunStage::Failed,
            &RunStage::TornDown
        ));
    }
}
