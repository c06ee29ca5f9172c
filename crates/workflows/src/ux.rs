//! UX research and design workflow.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use orchestrator::{PhaseDriver, Result, Workflow};
use repolens_core::AgentSpec;

use crate::prompts::UxPrompts;

const RESEARCHER_INSTRUCTIONS: &str = "\
You are a UX researcher. Your job is to:

1. Audit user-facing surfaces against established usability heuristics
2. Map user journeys end to end and find friction points
3. Back every finding with a concrete observation
4. Rate findings by severity so designers can prioritize

IMPORTANT: When asked to write to a file, ALWAYS use the Write tool
to create the actual file.";

const DESIGNER_INSTRUCTIONS: &str = "\
You are a UI designer. Your job is to:

1. Turn research findings into concrete, implementable design changes
2. Use the design tools when available; write markdown specs otherwise
3. Keep recommendations consistent with the existing interface language
4. Provide acceptance criteria for every recommendation

IMPORTANT: When asked to write to a file, ALWAYS use the Write tool
to create the actual file.";

/// UX audit and design-recommendation workflow.
pub struct UxWorkflow;

impl UxWorkflow {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UxWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Workflow for UxWorkflow {
    fn agents(&self) -> Vec<AgentSpec> {
        vec![
            AgentSpec::new(
                "ux-researcher",
                "Audits usability and maps user flows",
                RESEARCHER_INSTRUCTIONS,
            )
            .with_tools(["Read", "Grep", "Glob", "Write"]),
            AgentSpec::new(
                "ui-designer",
                "Produces design recommendations from research",
                DESIGNER_INSTRUCTIONS,
            )
            .with_tools(["Read", "Write"]),
        ]
    }

    fn base_tools(&self) -> Vec<String> {
        ["Read", "Write", "Grep", "Glob"]
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    fn subdirs(&self) -> Vec<String> {
        vec!["research".to_string(), "designs".to_string()]
    }

    fn expected_outputs(&self, output_dir: &Path) -> Vec<PathBuf> {
        vec![
            output_dir.join("research/heuristics.md"),
            output_dir.join("research/flows.md"),
            output_dir.join("designs/recommendations.md"),
        ]
    }

    async fn run(&self, driver: &mut PhaseDriver<'_>) -> Result<()> {
        let research = driver.output_dir().join("research");
        let designs = driver.output_dir().join("designs");

        driver
            .execute_phase(
                "Heuristics Audit",
                "ux-researcher",
                &UxPrompts::heuristics_audit(&research),
            )
            .await?;

        driver
            .execute_phase(
                "Flow Mapping",
                "ux-researcher",
                &UxPrompts::flow_mapping(&research),
            )
            .await?;

        driver
            .execute_phase(
                "Design Recommendations",
                "ui-designer",
                &UxPrompts::design_recommendations(&research, &designs),
            )
            .await?;

        Ok(())
    }
}
