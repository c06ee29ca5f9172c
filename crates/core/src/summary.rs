//! Run summary and output verification types.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Existence check for one declared output artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCheck {
    pub path: PathBuf,
    pub exists: bool,
    /// Size on disk; `None` when the file is missing.
    pub size_bytes: Option<u64>,
}

/// Advisory report over a workflow's declared outputs.
///
/// Verification never fails a run; callers inspect the report to decide
/// follow-up action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub checks: Vec<FileCheck>,
    pub all_present: bool,
}

impl VerificationReport {
    pub fn new(checks: Vec<FileCheck>) -> Self {
        let all_present = checks.iter().all(|c| c.exists);
        Self {
            checks,
            all_present,
        }
    }

    /// Paths that were declared but not found on disk.
    pub fn missing(&self) -> impl Iterator<Item = &PathBuf> {
        self.checks.iter().filter(|c| !c.exists).map(|c| &c.path)
    }
}

/// What one finished run reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub domain: String,
    pub output_dir: PathBuf,
    /// Completion order, duplicates included if a phase name was reused.
    pub completed_phases: Vec<String>,
    /// Last-recorded cost per phase name.
    pub phase_costs: HashMap<String, f64>,
    pub total_cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_all_present() {
        let report = VerificationReport::new(vec![FileCheck {
            path: PathBuf::from("x.md"),
            exists: true,
            size_bytes: Some(12),
        }]);
        assert!(report.all_present);
        assert_eq!(report.missing().count(), 0);
    }

    #[test]
    fn test_report_missing() {
        let report = VerificationReport::new(vec![
            FileCheck {
                path: PathBuf::from("x.md"),
                exists: true,
                size_bytes: Some(12),
            },
            FileCheck {
                path: PathBuf::from("y.md"),
                exists: false,
                size_bytes: None,
            },
        ]);
        assert!(!report.all_present);
        let missing: Vec<_> = report.missing().collect();
        assert_eq!(missing, vec![&PathBuf::from("y.md")]);
    }

    #[test]
    fn test_empty_report_is_present() {
        assert!(VerificationReport::new(Vec::new()).all_present);
    }
}
