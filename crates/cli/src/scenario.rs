// # -----------------------------
// # crates/cli/src/scenario.rs
// # -----------------------------
//! Scenario files describing a set of workspaces with scripted lifecycle
//! handlers and a sequence of navigation steps to replay.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use quantum_lifecycle::{
    HandlerLoader, LifecycleEventType, LifecycleHandler, LifecycleHandlers, NavigationTrigger,
    TransitionContext, WorkspaceDescriptor, WorkspaceRegistry,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub workspaces: Vec<WorkspaceSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceSpec {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_public: bool,
    /// Keyed by event name (`beforeActivate`, ...).
    #[serde(default)]
    pub handlers: HashMap<String, HandlerScript>,
}

/// Behaviour of one scripted handler.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HandlerScript {
    pub delay_ms: u64,
    pub fail: bool,
    pub fail_load: bool,
    /// Stop waiting as soon as the transition is superseded.
    pub respect_cancellation: bool,
    pub error: Option<String>,
}

/// One navigation event. `workspace` is the programmatic form and is turned
/// into the path that selects it.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub trigger: NavigationTrigger,
    #[serde(default = "default_await_completion")]
    pub await_completion: bool,
}

fn default_await_completion() -> bool {
    true
}

impl Step {
    pub fn location(&self) -> String {
        match (&self.path, &self.workspace) {
            (Some(path), _) => path.clone(),
            (None, Some(id)) => WorkspaceRegistry::path_for(id),
            (None, None) => "/".to_string(),
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read scenario {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parse scenario {}", path.display()))
    }

    /// Builds the registry with every scripted handler wired in.
    pub fn registry(&self) -> Result<WorkspaceRegistry> {
        let descriptors = self
            .workspaces
            .iter()
            .map(WorkspaceSpec::descriptor)
            .collect::<Result<Vec<_>>>()?;
        WorkspaceRegistry::new(descriptors).context("register scenario workspaces")
    }
}

impl WorkspaceSpec {
    fn descriptor(&self) -> Result<WorkspaceDescriptor> {
        let name = self.name.clone().unwrap_or_else(|| self.id.clone());
        let mut descriptor = WorkspaceDescriptor::new(&self.id, name, &self.icon);
        if self.is_default {
            descriptor = descriptor.as_default();
        }
        if self.is_public {
            descriptor = descriptor.public();
        }
        if self.handlers.is_empty() {
            return Ok(descriptor);
        }

        let mut handlers = LifecycleHandlers::new();
        for (name, script) in &self.handlers {
            let event = name
                .parse::<LifecycleEventType>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("workspace {}", self.id))?;
            handlers = handlers.on(event, Arc::new(ScriptedLoader(script.clone())));
        }
        Ok(descriptor.with_lifecycle(handlers))
    }
}

struct ScriptedLoader(HandlerScript);

#[async_trait]
impl HandlerLoader for ScriptedLoader {
    async fn load(&self) -> Result<Arc<dyn LifecycleHandler>> {
        if self.0.fail_load {
            bail!("scripted load failure");
        }
        Ok(Arc::new(ScriptedHandler(self.0.clone())))
    }
}

struct ScriptedHandler(HandlerScript);

#[async_trait]
impl LifecycleHandler for ScriptedHandler {
    async fn handle(&self, context: TransitionContext) -> Result<()> {
        let delay = Duration::from_millis(self.0.delay_ms);
        if self.0.respect_cancellation {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = context.cancellation().cancelled() => {
                    debug!("Scripted handler for {} abandoned", context.workspace().id);
                    return Ok(());
                }
            }
        } else {
            tokio::time::sleep(delay).await;
        }

        if self.0.fail {
            let message = self
                .0
                .error
                .clone()
                .unwrap_or_else(|| "scripted failure".to_string());
            bail!(message);
        }
        Ok(())
    }
}
