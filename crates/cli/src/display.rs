//! Terminal rendering of run events and summaries.

use colored::Colorize;

use events::{Event, EventBus};
use orchestrator::RunOutcome;

const RULE_WIDTH: usize = 70;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Subscribe to the bus and print events until the bus is dropped.
pub fn spawn_printer(bus: &EventBus) -> tokio::task::JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        while let Ok(envelope) = rx.recv().await {
            print_event(&envelope.event);
        }
    })
}

fn print_event(event: &Event) {
    match event {
        Event::RunStarted { domain, output_dir } => {
            println!("\n{}", rule());
            println!("{} {} orchestrator", "▶".green(), domain.to_uppercase().bold());
            println!("{}", rule());
            println!("Output directory: {}", output_dir);
        }
        Event::PhaseStarted { phase, agent, .. } => {
            println!("\n{}", rule());
            println!("{} {} ({})", "PHASE".bold(), phase.bold(), agent.dimmed());
            println!("{}", rule());
        }
        Event::PhaseCompleted {
            phase,
            cost_usd,
            success,
            ..
        } => {
            let marker = if *success { "✓".green() } else { "✗".red() };
            println!("{} {} (${:.4})", marker, phase, cost_usd);
        }
        Event::AgentText { text, .. } => {
            println!("\n{} {}", "agent:".cyan(), text);
        }
        Event::ToolInvoked {
            tool_name, input, ..
        } => match input {
            Some(input) => println!("  {} {} ({})", "tool:".yellow(), tool_name, input.dimmed()),
            None => println!("  {} {}", "tool:".yellow(), tool_name),
        },
        Event::ToolResult { content, .. } => {
            if let Some(content) = content {
                println!("    {} {}", "->".dimmed(), content.dimmed());
            }
        }
        Event::OutputChecked {
            path,
            exists,
            size_bytes,
        } => {
            if *exists {
                let size = size_bytes.unwrap_or(0);
                println!("{} {} ({} bytes)", "✓".green(), path, size);
            } else {
                println!("{} {} - NOT FOUND", "✗".red(), path);
            }
        }
        Event::DelegationInvoked {
            caller,
            callee,
            phase,
        } => {
            println!(
                "{} {} -> {} ({})",
                "link:".magenta(),
                caller,
                callee,
                phase
            );
        }
        Event::RunCompleted {
            domain,
            completed_phases,
            total_cost_usd,
            ..
        } => {
            println!("\n{}", rule());
            println!(
                "{} {} complete: {} phases, ${:.4}",
                "✓".green(),
                domain,
                completed_phases,
                total_cost_usd
            );
            println!("{}", rule());
        }
        Event::RunFailed { domain, error } => {
            println!("\n{} {} failed: {}", "✗".red(), domain, error);
        }
        Event::Error { message, context } => match context {
            Some(context) => println!("{} {} ({})", "error:".red(), message, context),
            None => println!("{} {}", "error:".red(), message),
        },
    }
}

/// Print the final run summary with a per-phase cost breakdown.
pub fn print_summary(outcome: &RunOutcome) {
    let summary = &outcome.summary;

    println!("\n{}", rule());
    println!(
        "{} {} ORCHESTRATOR SUMMARY",
        "#".bold(),
        summary.domain.to_uppercase().bold()
    );
    println!("{}", rule());
    println!("Output directory: {}", summary.output_dir.display());
    println!("Completed phases: {}", summary.completed_phases.len());
    println!("Total cost: ${:.4}", summary.total_cost);

    if !summary.phase_costs.is_empty() {
        println!("\nCost breakdown:");
        let mut printed = std::collections::HashSet::new();
        for phase in &summary.completed_phases {
            if printed.insert(phase.as_str()) {
                if let Some(cost) = summary.phase_costs.get(phase) {
                    println!("  - {}: ${:.4}", phase, cost);
                }
            }
        }
    }

    if outcome.verification.all_present {
        println!("\nAll declared outputs present.");
    } else {
        let missing: Vec<_> = outcome.verification.missing().collect();
        println!(
            "\n{} {} declared output(s) missing:",
            "!".yellow(),
            missing.len()
        );
        for path in missing {
            println!("  - {}", path.display());
        }
    }
    println!("{}", rule());
}
