use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use anyhow::anyhow;
use futures_util::FutureExt;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::cache::HandlerCache;
use crate::context::TransitionContext;
use crate::loader::{panic_message, HandlerResolver};
use crate::timeout::run_with_timeout_warning;
use crate::types::{LifecycleConfig, LifecycleEventType, NavigationTrigger};
use crate::workspace::Workspace;

/// What happened to one (workspace, event) dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum EventOutcome {
    /// No handler registered, or its loader failed.
    Skipped,
    Completed,
    Failed { error: String },
}

/// Loads, builds context for and runs exactly one handler, absorbing every
/// failure.
pub struct EventExecutor {
    resolver: HandlerResolver,
    config: LifecycleConfig,
}

impl EventExecutor {
    pub fn new(cache: Arc<HandlerCache>, config: LifecycleConfig) -> Self {
        Self {
            resolver: HandlerResolver::new(cache),
            config,
        }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<HandlerCache> {
        self.resolver.cache()
    }

    /// Never fails: a missing handler is skipped and a failing one is logged.
    pub async fn execute(
        &self,
        workspace: &Workspace,
        event: LifecycleEventType,
        previous_workspace: Option<&Workspace>,
        next_workspace: Option<&Workspace>,
        trigger: NavigationTrigger,
        cancellation: &CancellationToken,
    ) -> EventOutcome {
        let Some(handler) = self.resolver.resolve(workspace, event).await else {
            return EventOutcome::Skipped;
        };

        let context = TransitionContext::build(
            workspace,
            event,
            previous_workspace,
            next_workspace,
            trigger,
            cancellation,
        );

        if self.config.enable_logging {
            debug!(
                "Dispatching {} for workspace {} ({})",
                event, workspace.id, trigger
            );
        }
        let started = Instant::now();

        let threshold = self.config.timeout_warning();
        let result = AssertUnwindSafe(run_with_timeout_warning(
            handler.as_ref(),
            context,
            event,
            threshold,
        ))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(anyhow!("handler panicked: {}", panic_message(&*panic))));

        match result {
            Ok(()) => {
                if self.config.enable_logging {
                    debug!(
                        "Handler {} finished for workspace {} in {}ms",
                        event,
                        workspace.id,
                        started.elapsed().as_millis()
                    );
                }
                EventOutcome::Completed
            }
            Err(err) => {
                error!(
                    "Handler {} failed for workspace {}: {:#}",
                    event, workspace.id, err
                );
                EventOutcome::Failed {
                    error: format!("{:#}", err),
                }
            }
        }
    }
}
