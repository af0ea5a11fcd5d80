use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::handler::LifecycleHandler;
use crate::types::LifecycleEventType;

type WorkspaceEntry = HashMap<LifecycleEventType, Arc<dyn LifecycleHandler>>;

/// Resolved handlers per workspace id and event type.
///
/// Constructed once at application wiring and shared by every orchestrator
/// built from it. Entries live until `clear` is called.
#[derive(Default)]
pub struct HandlerCache {
    entries: RwLock<HashMap<String, WorkspaceEntry>>,
}

impl HandlerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        workspace_id: &str,
        event: LifecycleEventType,
    ) -> Option<Arc<dyn LifecycleHandler>> {
        self.read()
            .get(workspace_id)
            .and_then(|entry| entry.get(&event))
            .cloned()
    }

    /// Stores `handler` unless the key is already populated, and returns the
    /// handler that is cached afterwards. The first writer wins.
    pub fn insert(
        &self,
        workspace_id: &str,
        event: LifecycleEventType,
        handler: Arc<dyn LifecycleHandler>,
    ) -> Arc<dyn LifecycleHandler> {
        let mut entries = self.write();
        let stored = entries
            .entry(workspace_id.to_string())
            .or_default()
            .entry(event)
            .or_insert(handler);
        Arc::clone(stored)
    }

    pub fn contains(&self, workspace_id: &str, event: LifecycleEventType) -> bool {
        self.get(workspace_id, event).is_some()
    }

    /// Number of cached handlers across all workspaces.
    pub fn len(&self) -> usize {
        self.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached handler; loaders run again on their next event.
    pub fn clear(&self) {
        self.write().clear();
    }

    // Entries are write-once per key, so a poisoned guard still holds
    // consistent data.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, WorkspaceEntry>> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, WorkspaceEntry>> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
