use std::path::Path;

pub struct ArchitecturePrompts;

impl ArchitecturePrompts {
    pub fn component_inventory(docs_dir: &Path) -> String {
        format!(
            r#"Use the analyzer agent to create a comprehensive component inventory.

Analyze the codebase and document:
1. All modules and their purposes
2. Key types and functions with descriptions
3. Public API surface vs internal implementation
4. Entry points and main interfaces

Exclude generated output directories from the analysis.

Write your analysis to: `{path}`"#,
            path = docs_dir.join("01_component_inventory.md").display()
        )
    }

    pub fn architecture_overview(docs_dir: &Path, diagrams_dir: &Path) -> String {
        format!(
            r#"Building on the component inventory, document the system architecture.

1. Layering and module boundaries
2. Data flow between the major components
3. Key design decisions and their trade-offs

Create Mermaid diagrams for the component graph and the main data flow,
and save them to: `{diagrams}`

Write the overview to: `{path}`"#,
            diagrams = diagrams_dir.join("architecture.mmd").display(),
            path = docs_dir.join("02_architecture_overview.md").display()
        )
    }

    pub fn api_surface(docs_dir: &Path) -> String {
        format!(
            r#"Document the public API surface for developers.

1. Every public entry point with signature and a usage example
2. Error types callers must handle
3. Links to source files with specific line numbers

Write the documentation to: `{path}`"#,
            path = docs_dir.join("03_api_surface.md").display()
        )
    }

    pub fn infrastructure_context(docs_dir: &Path) -> String {
        format!(
            r#"Query the infrastructure tools (read-only) and document the deployed context:

1. Stacks and their resources
2. Policy violations, if any
3. How the deployed topology maps onto the code structure

Only use read-only queries. Write the findings to: `{path}`"#,
            path = docs_dir.join("04_infrastructure.md").display()
        )
    }

    pub fn executive_summary(docs_dir: &Path, reports_dir: &Path) -> String {
        format!(
            r#"Read the analysis documents in `{docs}` and write an executive summary:

1. What the system does, in one page
2. Architectural strengths and risks
3. Recommended follow-up work, prioritized

Write the summary to: `{path}`"#,
            docs = docs_dir.display(),
            path = reports_dir.join("summary.md").display()
        )
    }
}

pub struct UxPrompts;

impl UxPrompts {
    pub fn heuristics_audit(research_dir: &Path) -> String {
        format!(
            r#"Audit the user-facing surfaces of this project against usability heuristics.

1. Enumerate the user-facing entry points (CLI, config, output files)
2. Evaluate each against consistency, feedback, and error-recovery heuristics
3. Rate findings by severity

Write the audit to: `{path}`"#,
            path = research_dir.join("heuristics.md").display()
        )
    }

    pub fn flow_mapping(research_dir: &Path) -> String {
        format!(
            r#"Map the primary user flows through this project.

1. Identify the top user journeys end to end
2. Diagram each flow with Mermaid
3. Note friction points along each journey

Write the flows to: `{path}`"#,
            path = research_dir.join("flows.md").display()
        )
    }

    pub fn design_recommendations(research_dir: &Path, designs_dir: &Path) -> String {
        format!(
            r#"Read the research in `{research}` and produce design recommendations.

1. Concrete changes addressing the audit findings
2. Wireframe sketches where a design tool is available, markdown specs otherwise
3. An implementation-ready acceptance checklist

Write the recommendations to: `{path}`"#,
            research = research_dir.display(),
            path = designs_dir.join("recommendations.md").display()
        )
    }
}

pub struct ReviewPrompts;

impl ReviewPrompts {
    pub fn artifact_audit(target_dir: &Path, output_dir: &Path) -> String {
        format!(
            r#"Audit the analysis artifacts in `{target}`.

For each document:
1. Check that claims reference real files and line numbers
2. Flag sections that are vague, outdated, or unsupported
3. Note missing artifacts the analysis promised

Write the audit to: `{path}`"#,
            target = target_dir.display(),
            path = output_dir.join("findings.md").display()
        )
    }

    pub fn findings_report(output_dir: &Path) -> String {
        format!(
            r#"Consolidate the audit into a final review report.

1. Summarize the findings by severity
2. List concrete corrections for the analysis authors
3. State an overall verdict: accept, revise, or redo

Write the report to: `{path}`"#,
            path = output_dir.join("review_summary.md").display()
        )
    }
}
