use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use events::EventBus;
use orchestrator::{AgentCatalog, Orchestrator, OrchestratorConfig, Workflow};
use repolens_core::ToolProvider;
use runtime_client::RuntimeSessionFactory;
use tools::{FigmaIntegration, PulumiIntegration};
use workflows::{ArchitectureWorkflow, ReviewWorkflow, UxWorkflow};

mod display;

const DEFAULT_OUTPUT_BASE: &str = "repolens_output";

#[derive(Parser)]
#[command(name = "repolens")]
#[command(about = "Agent-driven repository analysis studio", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Agent runtime server to connect to
    #[arg(long, default_value = runtime_client::DEFAULT_BASE_URL)]
    runtime_url: String,

    /// Base directory for run outputs
    #[arg(long, default_value = DEFAULT_OUTPUT_BASE)]
    output_base: PathBuf,

    /// Do not timestamp the run directory
    #[arg(long)]
    no_timestamp: bool,

    /// Suppress tool invocation details in the progress output
    #[arg(long)]
    quiet_tools: bool,

    /// Directory of JSON agent records, grouped by domain
    #[arg(long)]
    agents_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the architecture analysis workflow
    Architecture,
    /// Run the UX research and design workflow
    Ux,
    /// Review the artifacts of a prior run
    Review {
        /// Output directory of the run to review
        target: PathBuf,
    },
    /// List agent records discoverable in the agents directory
    Agents {
        /// Restrict the listing to one domain
        #[arg(long)]
        domain: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Architecture => {
            let pulumi = PulumiIntegration::from_env();
            let workflow = ArchitectureWorkflow::new(pulumi.is_available());
            run_workflow(&cli, "architecture", &workflow, vec![Arc::new(pulumi)]).await
        }
        Commands::Ux => {
            let figma = FigmaIntegration::from_env();
            run_workflow(&cli, "ux", &UxWorkflow::new(), vec![Arc::new(figma)]).await
        }
        Commands::Review { target } => {
            anyhow::ensure!(
                target.is_dir(),
                "review target {} is not a directory",
                target.display()
            );
            let workflow = ReviewWorkflow::new(target.clone());
            run_workflow(&cli, "review", &workflow, Vec::new()).await
        }
        Commands::Agents { domain } => list_agents(&cli, domain.as_deref()),
    }
}

async fn run_workflow(
    cli: &Cli,
    domain: &str,
    workflow: &dyn Workflow,
    providers: Vec<Arc<dyn ToolProvider>>,
) -> Result<()> {
    let bus = EventBus::new();
    let printer = display::spawn_printer(&bus);

    let config = OrchestratorConfig {
        output_base_dir: cli.output_base.clone(),
        use_timestamp: !cli.no_timestamp,
        show_tool_details: !cli.quiet_tools,
    };
    let mut orchestrator = Orchestrator::new(domain, config, bus);
    if let Some(ref agents_dir) = cli.agents_dir {
        orchestrator = orchestrator.with_catalog(AgentCatalog::with_source(agents_dir));
    }
    for provider in providers {
        orchestrator.add_provider(provider);
    }

    let factory = RuntimeSessionFactory::new(&cli.runtime_url);
    let result = orchestrator.run(workflow, &factory).await;

    // Let the printer drain before reporting.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    printer.abort();

    match result {
        Ok(outcome) => {
            display::print_summary(&outcome);
            println!(
                "\nAnalysis complete. View results in: {}",
                outcome.summary.output_dir.display()
            );
            Ok(())
        }
        Err(error) => {
            eprintln!(
                "\nError during analysis: {}\nPartial results may be available in: {}",
                error,
                orchestrator.output_dir().display()
            );
            Err(error).context("orchestrator run failed")
        }
    }
}

fn list_agents(cli: &Cli, domain: Option<&str>) -> Result<()> {
    let agents_dir = cli
        .agents_dir
        .clone()
        .context("--agents-dir is required to list agents")?;

    let catalog = AgentCatalog::with_source(agents_dir);
    let discovered = catalog.discover(domain);

    if discovered.is_empty() {
        println!("No agent records found.");
        return Ok(());
    }

    for (name, path) in discovered {
        println!("{}  ({})", name, path.display());
    }
    Ok(())
}
