use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{LifecycleError, LifecycleResult};
use crate::orchestrator::{TransitionOrchestrator, TransitionReport};
use crate::types::{LifecycleConfig, NavigationTrigger};
use crate::workspace::Workspace;

#[derive(Default)]
struct MonitorState {
    /// Identity most recently reported by the navigation layer.
    observed: Option<String>,
    /// Workspace of the last transition that completed without being
    /// superseded.
    previous: Option<Workspace>,
    active_token: Option<CancellationToken>,
}

/// Watches the active workspace and drives a transition for every change.
///
/// At most one transition is current. Starting a new one cancels the token
/// of the one in flight; the superseded transition keeps running but no
/// longer updates the baseline or the busy signal.
pub struct TransitionMonitor {
    orchestrator: TransitionOrchestrator,
    show_loader: bool,
    state: Arc<Mutex<MonitorState>>,
    busy: Arc<watch::Sender<bool>>,
}

impl TransitionMonitor {
    pub fn new(orchestrator: TransitionOrchestrator, config: &LifecycleConfig) -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            orchestrator,
            show_loader: config.show_loader,
            state: Arc::new(Mutex::new(MonitorState::default())),
            busy: Arc::new(busy),
        }
    }

    /// Reports the currently active workspace (or none).
    ///
    /// Returns the handle of the spawned transition when one was started.
    /// Dropping the handle does not stop the transition. Must be called from
    /// within a tokio runtime.
    pub fn observe(
        &self,
        active: Option<Workspace>,
        trigger: NavigationTrigger,
    ) -> LifecycleResult<Option<JoinHandle<TransitionReport>>> {
        let mut state = lock(&self.state)?;

        let active_id = active.as_ref().map(|ws| ws.id.clone());
        if state.observed == active_id {
            return Ok(None);
        }
        state.observed = active_id;

        if let Some(token) = state.active_token.take() {
            token.cancel();
        }

        let Some(next) = active else {
            debug!("No active workspace; clearing transition baseline");
            state.previous = None;
            self.busy.send_replace(false);
            return Ok(None);
        };

        // Returning to the baseline while another transition was in flight:
        // that transition is abandoned and the baseline stays active.
        if state.previous.as_ref().map(|ws| ws.id.as_str()) == Some(next.id.as_str()) {
            debug!("Workspace {} is already active; no transition", next.id);
            self.busy.send_replace(false);
            return Ok(None);
        }

        let token = CancellationToken::new();
        state.active_token = Some(token.clone());
        let previous = state.previous.clone();
        self.busy.send_replace(true);
        drop(state);

        debug!(
            "Starting transition {} -> {}",
            previous.as_ref().map(|ws| ws.id.as_str()).unwrap_or("<none>"),
            next.id
        );

        let orchestrator = self.orchestrator.clone();
        let state = Arc::clone(&self.state);
        let busy = Arc::clone(&self.busy);

        let handle = tokio::spawn(async move {
            let report = orchestrator
                .run_transition(previous, next.clone(), trigger, token.clone())
                .await;

            // Checked under the same lock `observe` cancels with.
            let mut state = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if !token.is_cancelled() {
                state.previous = Some(next);
                state.active_token = None;
                busy.send_replace(false);
            } else {
                debug!(
                    "Transition {} was superseded; leaving baseline untouched",
                    report.transition_id
                );
            }

            report
        });

        Ok(Some(handle))
    }

    /// True while the current transition is executing.
    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    /// Whether the blocking overlay should be displayed right now.
    pub fn loader_visible(&self) -> bool {
        self.show_loader && self.is_busy()
    }

    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    /// Baseline used as the previous workspace of the next transition.
    pub fn previous_workspace(&self) -> LifecycleResult<Option<Workspace>> {
        Ok(lock(&self.state)?.previous.clone())
    }

    /// Cancels the transition in flight, if any, and clears the busy signal.
    /// The next observation is compared against the baseline again.
    pub fn shutdown(&self) -> LifecycleResult<()> {
        let mut state = lock(&self.state)?;
        if let Some(token) = state.active_token.take() {
            token.cancel();
        }
        state.observed = state.previous.as_ref().map(|ws| ws.id.clone());
        self.busy.send_replace(false);
        Ok(())
    }
}

fn lock(state: &Mutex<MonitorState>) -> LifecycleResult<MutexGuard<'_, MonitorState>> {
    state.lock().map_err(|_| LifecycleError::StatePoisoned)
}
