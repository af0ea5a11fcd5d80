use std::time::Duration;

use anyhow::Result;
use tracing::warn;

use crate::context::TransitionContext;
use crate::handler::LifecycleHandler;
use crate::types::LifecycleEventType;

/// Runs `handler` and warns once if it is still running after `threshold`.
///
/// The watchdog never interrupts the handler; its outcome is returned
/// unchanged. The timer lives on this future's stack and is dropped on every
/// exit path.
pub async fn run_with_timeout_warning(
    handler: &dyn LifecycleHandler,
    context: TransitionContext,
    event: LifecycleEventType,
    threshold: Duration,
) -> Result<()> {
    let workspace_id = context.workspace().id.clone();

    let work = handler.handle(context);
    tokio::pin!(work);
    let watchdog = tokio::time::sleep(threshold);
    tokio::pin!(watchdog);
    let mut warned = false;

    loop {
        tokio::select! {
            biased;
            outcome = &mut work => return outcome,
            _ = &mut watchdog, if !warned => {
                warned = true;
                warn!(
                    "Handler {} exceeded {}ms for workspace {}",
                    event,
                    threshold.as_millis(),
                    workspace_id
                );
            }
        }
    }
}
