use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::types::{LifecycleEventType, NavigationTrigger};
use crate::workspace::Workspace;

/// Transition metadata handed to a single handler invocation.
///
/// Built fresh for every call: two handlers of the same transition observe
/// distinct timestamps. Only activation events carry the previous workspace
/// and only deactivation events carry the next one.
#[derive(Clone, Debug)]
pub struct TransitionContext {
    workspace: Workspace,
    previous_workspace: Option<Workspace>,
    next_workspace: Option<Workspace>,
    trigger: NavigationTrigger,
    timestamp: DateTime<Utc>,
    cancellation: CancellationToken,
}

impl TransitionContext {
    pub fn build(
        workspace: &Workspace,
        event: LifecycleEventType,
        previous_workspace: Option<&Workspace>,
        next_workspace: Option<&Workspace>,
        trigger: NavigationTrigger,
        cancellation: &CancellationToken,
    ) -> Self {
        let (previous_workspace, next_workspace) = if event.is_activation() {
            (previous_workspace.cloned(), None)
        } else {
            (None, next_workspace.cloned())
        };

        Self {
            workspace: workspace.clone(),
            previous_workspace,
            next_workspace,
            trigger,
            timestamp: Utc::now(),
            cancellation: cancellation.clone(),
        }
    }

    /// The workspace the event fires for.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Workspace being left; set for activation events only.
    pub fn previous_workspace(&self) -> Option<&Workspace> {
        self.previous_workspace.as_ref()
    }

    /// Workspace being entered; set for deactivation events only.
    pub fn next_workspace(&self) -> Option<&Workspace> {
        self.next_workspace.as_ref()
    }

    pub fn trigger(&self) -> NavigationTrigger {
        self.trigger
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// True once a newer transition has superseded this one.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
