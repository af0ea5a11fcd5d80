// # -----------------------------
// # crates/cli/src/simulate.rs
// # -----------------------------
use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use quantum_lifecycle::{
    EventOutcome, HandlerCache, LifecycleConfig, NavigationTrigger, TransitionMonitor,
    TransitionOrchestrator, TransitionReport,
};

use crate::scenario::Scenario;

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub location: String,
    pub trigger: NavigationTrigger,
    pub active_workspace: Option<String>,
    /// Absent when the step did not change the active workspace.
    pub transition: Option<TransitionReport>,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub steps: Vec<StepReport>,
    pub final_workspace: Option<String>,
    pub busy: bool,
    pub cached_handlers: usize,
}

impl SimulationReport {
    pub fn failures(&self) -> usize {
        self.steps
            .iter()
            .filter_map(|step| step.transition.as_ref())
            .map(|transition| transition.failed().count())
            .sum()
    }

    pub fn render_pretty(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let _ = writeln!(
                out,
                "step {} {} [{}] -> {}",
                step.step,
                step.location,
                step.trigger,
                step.active_workspace.as_deref().unwrap_or("<none>")
            );
            let Some(transition) = &step.transition else {
                let _ = writeln!(out, "  (no transition)");
                continue;
            };
            for record in &transition.events {
                let status = match &record.outcome {
                    EventOutcome::Skipped => "skipped".to_string(),
                    EventOutcome::Completed => "completed".to_string(),
                    EventOutcome::Failed { error } => format!("failed: {}", error),
                };
                let _ = writeln!(
                    out,
                    "  {:<17} {:<12} {}",
                    record.event, record.workspace_id, status
                );
            }
        }
        let _ = writeln!(
            out,
            "final workspace: {}  busy: {}  cached handlers: {}",
            self.final_workspace.as_deref().unwrap_or("<none>"),
            self.busy,
            self.cached_handlers
        );
        out
    }
}

/// Replays every step of `scenario` through a fresh transition monitor.
pub async fn run(scenario: &Scenario, config: &LifecycleConfig) -> Result<SimulationReport> {
    let registry = scenario.registry()?;
    let cache = Arc::new(HandlerCache::new());
    let orchestrator = TransitionOrchestrator::new(Arc::clone(&cache), config.clone());
    let monitor = TransitionMonitor::new(orchestrator, config);

    info!(
        "Simulating {} steps across {} workspaces",
        scenario.steps.len(),
        registry.len()
    );

    let mut steps = Vec::with_capacity(scenario.steps.len());
    let mut pending: Vec<(usize, JoinHandle<TransitionReport>)> = Vec::new();

    for (index, step) in scenario.steps.iter().enumerate() {
        let location = step.location();
        let active = registry.active_for_path(&location);
        let active_workspace = active.as_ref().map(|ws| ws.id.clone());
        debug!(
            "Step {}: {} resolves to {}",
            index + 1,
            location,
            active_workspace.as_deref().unwrap_or("<none>")
        );

        let handle = monitor.observe(active, step.trigger)?;
        let transition = match handle {
            Some(handle) if step.await_completion => Some(
                handle
                    .await
                    .with_context(|| format!("transition for step {}", index + 1))?,
            ),
            Some(handle) => {
                pending.push((index, handle));
                None
            }
            None => None,
        };

        steps.push(StepReport {
            step: index + 1,
            location,
            trigger: step.trigger,
            active_workspace,
            transition,
        });
    }

    for (index, handle) in pending {
        let report = handle
            .await
            .with_context(|| format!("transition for step {}", index + 1))?;
        steps[index].transition = Some(report);
    }

    let final_workspace = monitor.previous_workspace()?.map(|ws| ws.id.clone());
    Ok(SimulationReport {
        steps,
        final_workspace,
        busy: monitor.is_busy(),
        cached_handlers: cache.len(),
    })
}
