use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{LifecycleError, LifecycleResult};
use crate::handler::HandlerLoader;
use crate::types::LifecycleEventType;

/// Shared, read-only handle to a registered workspace.
pub type Workspace = Arc<WorkspaceDescriptor>;

/// Loader slots a workspace registers for its lifecycle events. Every slot is
/// optional.
#[derive(Clone, Default)]
pub struct LifecycleHandlers {
    before_activate: Option<Arc<dyn HandlerLoader>>,
    after_activate: Option<Arc<dyn HandlerLoader>>,
    before_deactivate: Option<Arc<dyn HandlerLoader>>,
    after_deactivate: Option<Arc<dyn HandlerLoader>>,
}

impl LifecycleHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `loader` for `event`, replacing any previous registration.
    pub fn on(mut self, event: LifecycleEventType, loader: Arc<dyn HandlerLoader>) -> Self {
        *self.slot_mut(event) = Some(loader);
        self
    }

    pub fn get(&self, event: LifecycleEventType) -> Option<&Arc<dyn HandlerLoader>> {
        match event {
            LifecycleEventType::BeforeActivate => self.before_activate.as_ref(),
            LifecycleEventType::AfterActivate => self.after_activate.as_ref(),
            LifecycleEventType::BeforeDeactivate => self.before_deactivate.as_ref(),
            LifecycleEventType::AfterDeactivate => self.after_deactivate.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        LifecycleEventType::ALL
            .iter()
            .all(|event| self.get(*event).is_none())
    }

    pub fn registered(&self) -> Vec<LifecycleEventType> {
        LifecycleEventType::ALL
            .into_iter()
            .filter(|event| self.get(*event).is_some())
            .collect()
    }

    fn slot_mut(&mut self, event: LifecycleEventType) -> &mut Option<Arc<dyn HandlerLoader>> {
        match event {
            LifecycleEventType::BeforeActivate => &mut self.before_activate,
            LifecycleEventType::AfterActivate => &mut self.after_activate,
            LifecycleEventType::BeforeDeactivate => &mut self.before_deactivate,
            LifecycleEventType::AfterDeactivate => &mut self.after_deactivate,
        }
    }
}

impl fmt::Debug for LifecycleHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.registered()).finish()
    }
}

/// An independently routed application module mounted into the shell.
#[derive(Clone, Debug)]
pub struct WorkspaceDescriptor {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub is_default: bool,
    pub is_public: bool,
    pub lifecycle: Option<LifecycleHandlers>,
}

impl WorkspaceDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            is_default: false,
            is_public: false,
            lifecycle: None,
        }
    }

    pub fn with_lifecycle(mut self, handlers: LifecycleHandlers) -> Self {
        self.lifecycle = Some(handlers);
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    pub fn into_shared(self) -> Workspace {
        Arc::new(self)
    }
}

/// The set of workspaces known to the shell, keyed by id.
#[derive(Debug, Default)]
pub struct WorkspaceRegistry {
    ordered: Vec<Workspace>,
    by_id: HashMap<String, Workspace>,
}

impl WorkspaceRegistry {
    /// Builds the registry, rejecting duplicate ids.
    pub fn new(workspaces: Vec<WorkspaceDescriptor>) -> LifecycleResult<Self> {
        let mut registry = Self::default();
        for descriptor in workspaces {
            if registry.by_id.contains_key(&descriptor.id) {
                return Err(LifecycleError::DuplicateWorkspace { id: descriptor.id });
            }
            let workspace = descriptor.into_shared();
            registry
                .by_id
                .insert(workspace.id.clone(), Arc::clone(&workspace));
            registry.ordered.push(workspace);
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<Workspace> {
        self.by_id.get(id).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Workspace> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn default_workspace(&self) -> Option<Workspace> {
        self.ordered.iter().find(|ws| ws.is_default).cloned()
    }

    /// Active workspace for an absolute location path: the segment after the
    /// leading `/` is the workspace id (`/tasks/42` selects `tasks`).
    pub fn active_for_path(&self, path: &str) -> Option<Workspace> {
        let id = path.split('/').nth(1)?;
        if id.is_empty() {
            return None;
        }
        self.get(id)
    }

    /// Location path that activates `id`; an empty id leads to the root.
    pub fn path_for(id: &str) -> String {
        if id.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", id)
        }
    }
}
