//! Orchestrator lifecycle and phase execution.
//!
//! One [`Orchestrator`] instance drives one run of one workflow:
//!
//! 1. create the output structure (idempotent),
//! 2. assemble the capability set (agents via the catalog, allowed tools
//!    as workflow base tools plus every available provider's tools),
//! 3. open one execution session bound to that fixed set,
//! 4. let the workflow sequence its phases through [`PhaseDriver`],
//! 5. verify declared artifacts (advisory), emit the summary,
//! 6. close the session on every exit path.
//!
//! Phases run strictly sequentially; later phases read files earlier
//! phases wrote, so sequential, fully-materialized hand-off is the
//! correctness mechanism. Failed runs keep completed phases' artifacts
//! on disk for inspection.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use futures::StreamExt;
use tracing::{debug, info, warn};

use events::{Event, EventBus};
use repolens_core::{
    AgentSpec, CapabilitySet, ResponseEvent, RunSummary, SessionFactory, ToolProvider,
    VerificationReport,
};

use crate::accounting::{self, RunState};
use crate::catalog::AgentCatalog;
use crate::emitter::RunEventEmitter;
use crate::error::{OrchestratorError, Result};
use crate::guard::RunGuard;
use crate::registry::{DelegationContext, OrchestratorRegistry, PhaseDelegate};
use crate::stage::{RunLifecycle, RunStage};

/// Construction-time settings for one orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Base directory all run outputs live under.
    pub output_base_dir: PathBuf,
    /// Suffix the run directory with a timestamp so repeated runs of the
    /// same domain never collide.
    pub use_timestamp: bool,
    /// Forward tool invocations/results to the event bus.
    pub show_tool_details: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            output_base_dir: PathBuf::from("repolens_output"),
            use_timestamp: true,
            show_tool_details: true,
        }
    }
}

/// A declarative workflow: the three operations the engine requires,
/// plus optional output declarations.
#[async_trait]
pub trait Workflow: Send + Sync {
    /// Capability records for this workflow's agents.
    fn agents(&self) -> Vec<AgentSpec>;

    /// The workflow's own allowed-tool floor, before provider merging.
    fn base_tools(&self) -> Vec<String>;

    /// Subdirectories to create under the output root.
    fn subdirs(&self) -> Vec<String> {
        Vec::new()
    }

    /// Artifacts to verify after the run. Advisory only.
    fn expected_outputs(&self, _output_dir: &Path) -> Vec<PathBuf> {
        Vec::new()
    }

    /// The phase sequence. Ordering is the workflow author's
    /// responsibility: a phase that reads a prior phase's output must be
    /// sequenced after it.
    async fn run(&self, driver: &mut PhaseDriver<'_>) -> Result<()>;
}

/// What [`Orchestrator::run`] hands back: the summary plus the advisory
/// verification report.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub verification: VerificationReport,
}

/// Drives a named domain's phase sequence end-to-end.
pub struct Orchestrator {
    domain: String,
    output_dir: PathBuf,
    stage: RunStage,
    state: RunState,
    emitter: RunEventEmitter,
    catalog: AgentCatalog,
    providers: Vec<Arc<dyn ToolProvider>>,
    registry: OrchestratorRegistry,
}

impl Orchestrator {
    pub fn new(domain: impl Into<String>, config: OrchestratorConfig, bus: EventBus) -> Self {
        let domain = domain.into();
        let dir_name = if config.use_timestamp {
            format!("{}_{}", domain, Local::now().format("%Y%m%d_%H%M%S"))
        } else {
            format!("{}_analysis", domain)
        };
        let output_dir = config.output_base_dir.join(dir_name);

        Self {
            domain,
            output_dir,
            stage: RunStage::Constructed,
            state: RunState::new(),
            emitter: RunEventEmitter::new(bus, config.show_tool_details),
            catalog: AgentCatalog::new(),
            providers: Vec::new(),
            registry: OrchestratorRegistry::new(),
        }
    }

    /// Replace the catalog, e.g. with one backed by a record directory.
    pub fn with_catalog(mut self, catalog: AgentCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Add an external tool capability provider. Available providers
    /// contribute their allowed tools to the session capability set.
    pub fn add_provider(&mut self, provider: Arc<dyn ToolProvider>) {
        self.providers.push(provider);
    }

    /// Register a peer orchestrator for cross-domain delegation.
    pub fn register_peer(&mut self, name: impl Into<String>, delegate: Arc<dyn PhaseDelegate>) {
        self.registry.register(name, delegate);
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn emitter(&self) -> &RunEventEmitter {
        &self.emitter
    }

    /// Create the output root and declared subdirectories.
    ///
    /// Idempotent: pre-existing directories are not an error.
    pub fn create_output_structure(&self, subdirs: &[String]) -> Result<()> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| OrchestratorError::structure(self.output_dir.clone(), e))?;

        for subdir in subdirs {
            let path = self.output_dir.join(subdir);
            fs::create_dir_all(&path).map_err(|e| OrchestratorError::structure(path.clone(), e))?;
        }
        Ok(())
    }

    /// Resolve the full agent set and allowed-tool set for one run.
    ///
    /// Computed once, before the session opens; the result is immutable
    /// for the run's lifetime. Tool order is first-occurrence: workflow
    /// base tools, then each available provider's tools.
    pub fn assemble_capabilities(&mut self, workflow: &dyn Workflow) -> Result<CapabilitySet> {
        let mut agents: HashMap<String, AgentSpec> = HashMap::new();
        for spec in workflow.agents() {
            let name = spec.name.clone();
            self.catalog.register(spec);
            let resolved = self.catalog.resolve(&name, Some(&self.domain))?;
            agents.insert(name, resolved);
        }
        // Records from the external source for this domain, if configured.
        for (name, spec) in self.catalog.load_domain(&self.domain)? {
            agents.entry(name).or_insert(spec);
        }

        let mut allowed = Vec::new();
        let mut seen = HashSet::new();
        for tool in workflow.base_tools() {
            if seen.insert(tool.clone()) {
                allowed.push(tool);
            }
        }
        for provider in &self.providers {
            if !provider.is_available() {
                debug!(provider = provider.name(), "Tool provider unavailable");
                continue;
            }
            let tools = provider.allowed_tools();
            info!(
                provider = provider.name(),
                tools = tools.len(),
                "Tool provider available"
            );
            for tool in tools {
                if seen.insert(tool.clone()) {
                    allowed.push(tool);
                }
            }
        }

        Ok(CapabilitySet::new(agents, allowed))
    }

    /// Run the workflow end-to-end with session setup and teardown.
    pub async fn run(
        &mut self,
        workflow: &dyn Workflow,
        factory: &dyn SessionFactory,
    ) -> Result<RunOutcome> {
        self.create_output_structure(&workflow.subdirs())?;
        self.advance(RunStage::StructureReady)?;

        let capabilities = self.assemble_capabilities(workflow)?;
        let mut session = factory.open(&capabilities).await?;
        self.advance(RunStage::Running)?;

        info!(
            domain = %self.domain,
            output_dir = %self.output_dir.display(),
            agents = capabilities.agents().len(),
            allowed_tools = capabilities.allowed_tools().len(),
            "Run started"
        );
        self.emitter.emit(Event::RunStarted {
            domain: self.domain.clone(),
            output_dir: self.output_dir.display().to_string(),
        });
        let mut guard = RunGuard::new(self.domain.clone(), self.emitter.clone());

        let run_result = {
            let mut driver = PhaseDriver {
                orchestrator: self,
                session: session.as_mut(),
            };
            workflow.run(&mut driver).await
        };

        // The session is released on every exit path before the result
        // propagates.
        let close_result = session.close().await;

        if let Err(error) = run_result {
            self.stage = RunStage::Failed;
            guard.mark_failed(&error.to_string());
            if let Err(close_error) = close_result {
                warn!(error = %close_error, "Session close failed after run error");
            }
            warn!(
                domain = %self.domain,
                output_dir = %self.output_dir.display(),
                "Run failed; partial artifacts retained"
            );
            return Err(error);
        }
        if let Err(close_error) = close_result {
            self.stage = RunStage::Failed;
            guard.mark_failed(&close_error.to_string());
            return Err(close_error.into());
        }

        self.advance(RunStage::Verifying)?;
        let expected = workflow.expected_outputs(&self.output_dir);
        let verification = accounting::verify_outputs(&expected).await;
        for check in &verification.checks {
            self.emitter.emit(Event::OutputChecked {
                path: check.path.display().to_string(),
                exists: check.exists,
                size_bytes: check.size_bytes,
            });
        }
        if !verification.all_present {
            warn!(
                domain = %self.domain,
                missing = verification.missing().count(),
                "Declared outputs missing after run"
            );
        }

        self.advance(RunStage::Summarized)?;
        let summary = RunSummary {
            domain: self.domain.clone(),
            output_dir: self.output_dir.clone(),
            completed_phases: self.state.completed_phases().to_vec(),
            phase_costs: self.state.phase_costs().clone(),
            total_cost: self.state.total_cost(),
        };
        self.emitter.emit(Event::RunCompleted {
            domain: summary.domain.clone(),
            output_dir: summary.output_dir.display().to_string(),
            completed_phases: summary.completed_phases.len(),
            total_cost_usd: summary.total_cost,
        });
        guard.mark_completed();

        self.advance(RunStage::TornDown)?;
        info!(
            domain = %self.domain,
            phases = summary.completed_phases.len(),
            total_cost_usd = summary.total_cost,
            "Run complete"
        );

        Ok(RunOutcome {
            summary,
            verification,
        })
    }

    fn advance(&mut self, to: RunStage) -> Result<()> {
        RunLifecycle::validate_transition(&self.stage, &to)?;
        debug!(
            domain = %self.domain,
            from = self.stage.as_str(),
            to = to.as_str(),
            "Run stage transition"
        );
        self.stage = to;
        Ok(())
    }
}

/// The workflow-facing handle for one running orchestration.
///
/// Borrows the orchestrator and the open session for the duration of the
/// workflow's `run` body; the session handle never outlives that scope.
pub struct PhaseDriver<'a> {
    orchestrator: &'a mut Orchestrator,
    session: &'a mut dyn repolens_core::ExecutionSession,
}

impl PhaseDriver<'_> {
    pub fn domain(&self) -> &str {
        &self.orchestrator.domain
    }

    pub fn output_dir(&self) -> &Path {
        &self.orchestrator.output_dir
    }

    pub fn emitter(&self) -> &RunEventEmitter {
        &self.orchestrator.emitter
    }

    /// Execute one phase: send the instruction to the named agent, then
    /// consume the event sequence until the result event.
    ///
    /// The phase is recorded as completed with its cost regardless of the
    /// reported `success` flag; a workflow that needs hard failure on a
    /// bad phase must inspect its artifacts and return an error itself.
    /// A stream that ends or errors before the result event fails the
    /// phase.
    ///
    /// Returns the phase's reported cost.
    pub async fn execute_phase(
        &mut self,
        phase_name: &str,
        agent_name: &str,
        instruction: &str,
    ) -> Result<f64> {
        let Self {
            orchestrator,
            session,
        } = self;

        info!(
            domain = %orchestrator.domain,
            phase = phase_name,
            agent = agent_name,
            "Executing phase"
        );
        orchestrator.emitter.emit(Event::PhaseStarted {
            domain: orchestrator.domain.clone(),
            phase: phase_name.to_string(),
            agent: agent_name.to_string(),
        });

        session
            .send(agent_name, instruction)
            .await
            .map_err(|e| OrchestratorError::phase_failed(phase_name, e))?;

        let mut result: Option<(f64, bool)> = None;
        {
            let mut stream = session.events();
            while let Some(item) = stream.next().await {
                let event = item.map_err(|e| OrchestratorError::phase_failed(phase_name, e))?;
                orchestrator.emitter.forward_response(phase_name, &event);
                if let ResponseEvent::PhaseResult { cost_usd, success } = event {
                    result = Some((cost_usd, success));
                    break;
                }
            }
        }

        let (cost_usd, success) = result.ok_or_else(|| {
            OrchestratorError::phase_failed(phase_name, "event stream ended without a result event")
        })?;

        orchestrator.state.track_phase_cost(phase_name, cost_usd);
        orchestrator.state.mark_phase_complete(phase_name);
        orchestrator.emitter.emit(Event::PhaseCompleted {
            domain: orchestrator.domain.clone(),
            phase: phase_name.to_string(),
            cost_usd,
            success,
        });
        info!(
            domain = %orchestrator.domain,
            phase = phase_name,
            cost_usd,
            success,
            "Phase completed"
        );

        Ok(cost_usd)
    }

    /// Delegate a phase to a registered peer orchestrator.
    pub async fn invoke_peer(
        &mut self,
        name: &str,
        phase_name: &str,
        context: &DelegationContext,
    ) -> Result<serde_json::Value> {
        self.orchestrator.emitter.emit(Event::DelegationInvoked {
            caller: self.orchestrator.domain.clone(),
            callee: name.to_string(),
            phase: phase_name.to_string(),
        });
        self.orchestrator
            .registry
            .invoke(name, phase_name, context)
            .await
    }
}
