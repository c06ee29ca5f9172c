//! Cost and checkpoint accounting for one run.
//!
//! Pure bookkeeping: cost accumulates additively, completion records
//! append in call order, and verification reduces declared paths to an
//! advisory existence report.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use repolens_core::{FileCheck, VerificationReport};

/// Mutable tracking state owned by one orchestrator for one run.
#[derive(Debug, Default)]
pub struct RunState {
    completed_phases: Vec<String>,
    phase_costs: HashMap<String, f64>,
    total_cost: f64,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a phase's cost. The per-phase entry is last-write-wins;
    /// the total always accumulates.
    pub fn track_phase_cost(&mut self, phase_name: &str, cost: f64) {
        self.phase_costs.insert(phase_name.to_string(), cost);
        self.total_cost += cost;
    }

    /// Append a completion record. Duplicates are kept: completion order
    /// is the call order of `execute_phase`.
    pub fn mark_phase_complete(&mut self, phase_name: &str) {
        self.completed_phases.push(phase_name.to_string());
    }

    pub fn completed_phases(&self) -> &[String] {
        &self.completed_phases
    }

    pub fn phase_costs(&self) -> &HashMap<String, f64> {
        &self.phase_costs
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }
}

/// Check each declared output path against the filesystem.
///
/// Missing artifacts are reported, never raised.
pub async fn verify_outputs(expected: &[PathBuf]) -> VerificationReport {
    let mut checks = Vec::with_capacity(expected.len());
    for path in expected {
        checks.push(check_file(path).await);
    }
    VerificationReport::new(checks)
}

async fn check_file(path: &Path) -> FileCheck {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => FileCheck {
            path: path.to_path_buf(),
            exists: true,
            size_bytes: Some(meta.len()),
        },
        _ => FileCheck {
            path: path.to_path_buf(),
            exists: false,
            size_bytes: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cost_accumulation() {
        let mut state = RunState::new();
        state.track_phase_cost("A", 0.10);
        state.track_phase_cost("B", 0.25);
        state.track_phase_cost("C", 0.00);

        assert!((state.total_cost() - 0.35).abs() < f64::EPSILON);
        assert_eq!(state.phase_costs()["B"], 0.25);
    }

    #[test]
    fn test_rerun_overwrites_cost_but_appends_completion() {
        let mut state = RunState::new();
        state.track_phase_cost("A", 0.10);
        state.mark_phase_complete("A");
        state.track_phase_cost("A", 0.20);
        state.mark_phase_complete("A");

        assert_eq!(state.phase_costs()["A"], 0.20);
        assert!((state.total_cost() - 0.30).abs() < f64::EPSILON);
        assert_eq!(state.completed_phases(), ["A", "A"]);
    }

    #[test]
    fn test_completion_ordering() {
        let mut state = RunState::new();
        for name in ["A", "B", "C"] {
            state.mark_phase_complete(name);
        }
        assert_eq!(state.completed_phases(), ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_verification_mixed() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("x.md");
        fs::write(&present, "content").unwrap();
        let missing = dir.path().join("y.md");

        let report = verify_outputs(&[present.clone(), missing.clone()]).await;
        assert!(!report.all_present);
        assert_eq!(report.checks.len(), 2);
        assert_eq!(report.checks[0].size_bytes, Some(7));
        assert!(!report.checks[1].exists);
        assert_eq!(report.checks[1].size_bytes, None);
    }

    #[tokio::test]
    async fn test_verification_all_present() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("x.md");
        fs::write(&file, "ok").unwrap();

        let report = verify_outputs(&[file]).await;
        assert!(report.all_present);
    }

    #[tokio::test]
    async fn test_verification_directory_is_not_an_artifact() {
        let dir = TempDir::new().unwrap();
        let report = verify_outputs(&[dir.path().to_path_buf()]).await;
        assert!(!report.all_present);
    }
}
