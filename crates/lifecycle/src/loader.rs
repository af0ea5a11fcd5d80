use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::anyhow;
use futures_util::FutureExt;
use tracing::{debug, error};

use crate::cache::HandlerCache;
use crate::handler::LifecycleHandler;
use crate::types::LifecycleEventType;
use crate::workspace::WorkspaceDescriptor;

/// Resolves a workspace's handler for one event type, memoized in a shared
/// `HandlerCache`.
#[derive(Clone)]
pub struct HandlerResolver {
    cache: Arc<HandlerCache>,
}

impl HandlerResolver {
    pub fn new(cache: Arc<HandlerCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<HandlerCache> {
        &self.cache
    }

    /// Returns `None` when the workspace registers no loader for `event` or
    /// when its loader fails. Failures are logged and not cached, so the
    /// loader is tried again the next time the event fires.
    pub async fn resolve(
        &self,
        workspace: &WorkspaceDescriptor,
        event: LifecycleEventType,
    ) -> Option<Arc<dyn LifecycleHandler>> {
        if let Some(handler) = self.cache.get(&workspace.id, event) {
            return Some(handler);
        }

        let loader = workspace.lifecycle.as_ref()?.get(event)?;

        let loaded = AssertUnwindSafe(loader.load())
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(anyhow!("loader panicked: {}", panic_message(&*panic))));

        match loaded {
            Ok(handler) => {
                debug!("Loaded {} handler for workspace {}", event, workspace.id);
                Some(self.cache.insert(&workspace.id, event, handler))
            }
            Err(err) => {
                error!(
                    "Failed to load {} handler for workspace {}: {:#}",
                    event, workspace.id, err
                );
                None
            }
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
