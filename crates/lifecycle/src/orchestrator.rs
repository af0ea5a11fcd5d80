use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::cache::HandlerCache;
use crate::executor::{EventExecutor, EventOutcome};
use crate::types::{LifecycleConfig, LifecycleEventType, NavigationTrigger};
use crate::workspace::Workspace;

#[derive(Clone, Debug, Serialize)]
pub struct EventRecord {
    pub workspace_id: String,
    pub event: LifecycleEventType,
    pub outcome: EventOutcome,
}

/// Ordered account of the events one transition dispatched.
#[derive(Clone, Debug, Serialize)]
pub struct TransitionReport {
    pub transition_id: String,
    pub previous_workspace: Option<String>,
    pub next_workspace: String,
    pub trigger: NavigationTrigger,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub events: Vec<EventRecord>,
}

impl TransitionReport {
    pub fn failed(&self) -> impl Iterator<Item = &EventRecord> {
        self.events
            .iter()
            .filter(|record| matches!(record.outcome, EventOutcome::Failed { .. }))
    }

    /// Events for which a handler actually ran.
    pub fn fired(&self) -> impl Iterator<Item = &EventRecord> {
        self.events
            .iter()
            .filter(|record| record.outcome != EventOutcome::Skipped)
    }
}

/// Sequences the four lifecycle phases of a workspace switch.
#[derive(Clone)]
pub struct TransitionOrchestrator {
    executor: Arc<EventExecutor>,
}

impl TransitionOrchestrator {
    pub fn new(cache: Arc<HandlerCache>, config: LifecycleConfig) -> Self {
        Self {
            executor: Arc::new(EventExecutor::new(cache, config)),
        }
    }

    pub fn executor(&self) -> &EventExecutor {
        &self.executor
    }

    /// Runs beforeDeactivate and afterDeactivate on `previous` (when there is
    /// one), then beforeActivate and afterActivate on `next`. Each phase
    /// settles before the next starts; handler failures never escape.
    pub async fn run_transition(
        &self,
        previous: Option<Workspace>,
        next: Workspace,
        trigger: NavigationTrigger,
        cancellation: CancellationToken,
    ) -> TransitionReport {
        let started_at = Utc::now();
        let mut events = Vec::with_capacity(4);

        if let Some(previous) = previous.as_ref() {
            for event in [
                LifecycleEventType::BeforeDeactivate,
                LifecycleEventType::AfterDeactivate,
            ] {
                let outcome = self
                    .executor
                    .execute(previous, event, None, Some(&next), trigger, &cancellation)
                    .await;
                events.push(EventRecord {
                    workspace_id: previous.id.clone(),
                    event,
                    outcome,
                });
            }
        }

        for event in [
            LifecycleEventType::BeforeActivate,
            LifecycleEventType::AfterActivate,
        ] {
            let outcome = self
                .executor
                .execute(&next, event, previous.as_ref(), None, trigger, &cancellation)
                .await;
            events.push(EventRecord {
                workspace_id: next.id.clone(),
                event,
                outcome,
            });
        }

        TransitionReport {
            transition_id: Uuid::new_v4().to_string(),
            previous_workspace: previous.map(|ws| ws.id.clone()),
            next_workspace: next.id.clone(),
            trigger,
            started_at,
            finished_at: Utc::now(),
            events,
        }
    }
}
