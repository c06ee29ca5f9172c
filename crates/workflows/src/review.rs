//! Cross-run review workflow.
//!
//! Reviews the artifacts a prior analysis run produced. Other workflows
//! can also reach its artifact index without re-deriving it, through the
//! cross-orchestrator registry via [`ArtifactIndexDelegate`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use orchestrator::{
    DelegationContext, OrchestratorError, PhaseDelegate, PhaseDriver, Result, Workflow,
};
use repolens_core::AgentSpec;

use crate::prompts::ReviewPrompts;

const REVIEWER_INSTRUCTIONS: &str = "\
You are a rigorous analysis reviewer. Your job is to:

1. Verify that documentation claims match the code they cite
2. Distinguish supported findings from speculation
3. Report every gap with a concrete pointer to the offending section
4. Give actionable corrections, not restatements of the problem

IMPORTANT: When asked to write to a file, ALWAYS use the Write tool
to create the actual file.";

/// Reviews the output directory of a prior run.
pub struct ReviewWorkflow {
    target_dir: PathBuf,
}

impl ReviewWorkflow {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }
}

#[async_trait]
impl Workflow for ReviewWorkflow {
    fn agents(&self) -> Vec<AgentSpec> {
        vec![AgentSpec::new(
            "reviewer",
            "Reviews analysis artifacts for accuracy and completeness",
            REVIEWER_INSTRUCTIONS,
        )
        .with_tools(["Read", "Grep", "Glob", "Write"])]
    }

    fn base_tools(&self) -> Vec<String> {
        ["Read", "Write", "Grep", "Glob"]
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    fn expected_outputs(&self, output_dir: &Path) -> Vec<PathBuf> {
        vec![
            output_dir.join("findings.md"),
            output_dir.join("review_summary.md"),
        ]
    }

    async fn run(&self, driver: &mut PhaseDriver<'_>) -> Result<()> {
        let output_dir = driver.output_dir().to_path_buf();

        driver
            .execute_phase(
                "Artifact Audit",
                "reviewer",
                &ReviewPrompts::artifact_audit(&self.target_dir, &output_dir),
            )
            .await?;

        driver
            .execute_phase(
                "Findings Report",
                "reviewer",
                &ReviewPrompts::findings_report(&output_dir),
            )
            .await?;

        Ok(())
    }
}

/// Delegate exposing a run directory's artifact index to peer
/// orchestrators.
///
/// Context key `"subdir"` (optional) narrows the listing; the result is
/// a JSON object with the run directory and its markdown artifacts.
pub struct ArtifactIndexDelegate {
    run_dir: PathBuf,
}

impl ArtifactIndexDelegate {
    pub fn new(run_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_dir: run_dir.into(),
        }
    }

    fn index(&self, root: &Path) -> Vec<String> {
        let mut artifacts = Vec::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().is_some_and(|ext| ext == "md") {
                    if let Ok(relative) = path.strip_prefix(root) {
                        artifacts.push(relative.display().to_string());
                    }
                }
            }
        }
        artifacts.sort();
        artifacts
    }
}

#[async_trait]
impl PhaseDelegate for ArtifactIndexDelegate {
    async fn invoke_phase(
        &self,
        phase_name: &str,
        context: &DelegationContext,
    ) -> Result<Value> {
        if phase_name != "artifact_index" {
            return Err(OrchestratorError::Delegation {
                callee: "review".to_string(),
                reason: format!("unknown phase '{}'", phase_name),
            });
        }

        let root = match context.get("subdir").and_then(Value::as_str) {
            Some(subdir) => self.run_dir.join(subdir),
            None => self.run_dir.clone(),
        };
        debug!(root = %root.display(), "Indexing artifacts for peer");

        Ok(json!({
            "run_dir": self.run_dir.display().to_string(),
            "artifacts": self.index(&root),
        }))
    }
}
