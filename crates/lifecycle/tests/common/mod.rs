#![allow(dead_code)]

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use quantum_lifecycle::{
    handler_fn, ready, HandlerLoader, LifecycleConfig, LifecycleEventType, LifecycleHandlers,
    Workspace, WorkspaceDescriptor,
};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Records every emitted event as `(level, message)` for assertions.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    records: Arc<Mutex<Vec<(Level, String)>>>,
}

impl CapturedLogs {
    /// Installs the capture as the thread's default subscriber.
    pub fn install() -> (Self, DefaultGuard) {
        let logs = Self::default();
        let subscriber = tracing_subscriber::registry().with(logs.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    pub fn at(&self, level: Level) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(lvl, _)| *lvl == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at(Level::WARN)
    }

    pub fn errors(&self) -> Vec<String> {
        self.at(Level::ERROR)
    }

    /// Records at info level or above.
    pub fn visible(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(lvl, _)| *lvl <= Level::INFO)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.records
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

pub type ExecutionLog = Arc<Mutex<Vec<String>>>;

pub fn execution_log() -> ExecutionLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &ExecutionLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Configuration with dispatch tracing off, so successful runs stay silent.
pub fn quiet_config() -> LifecycleConfig {
    LifecycleConfig {
        enable_logging: false,
        ..LifecycleConfig::default()
    }
}

pub fn workspace(id: &str) -> Workspace {
    WorkspaceDescriptor::new(id, format!("Workspace {}", id), "icon").into_shared()
}

pub fn workspace_with(id: &str, handlers: LifecycleHandlers) -> Workspace {
    WorkspaceDescriptor::new(id, format!("Workspace {}", id), "icon")
        .with_lifecycle(handlers)
        .into_shared()
}

/// Loader for a handler that appends `label` to `log`.
pub fn recording(log: &ExecutionLog, label: &str) -> Arc<dyn HandlerLoader> {
    let log = log.clone();
    let label = label.to_string();
    ready(handler_fn(move |_ctx| {
        let log = log.clone();
        let label = label.clone();
        async move {
            log.lock().unwrap().push(label);
            Ok(())
        }
    }))
}

/// Loader for a handler that sleeps `delay`, then records either
/// `<label>-aborted` or `<label>-complete` depending on its token.
pub fn cooperative(log: &ExecutionLog, label: &str, delay: Duration) -> Arc<dyn HandlerLoader> {
    let log = log.clone();
    let label = label.to_string();
    ready(handler_fn(move |ctx| {
        let log = log.clone();
        let label = label.clone();
        async move {
            log.lock().unwrap().push(format!("{}-start", label));
            tokio::time::sleep(delay).await;
            if ctx.is_cancelled() {
                log.lock().unwrap().push(format!("{}-aborted", label));
                return Ok(());
            }
            log.lock().unwrap().push(format!("{}-complete", label));
            Ok(())
        }
    }))
}

/// All four events, each recording `<event>(<id>)`.
pub fn all_recording(log: &ExecutionLog, id: &str) -> LifecycleHandlers {
    LifecycleEventType::ALL
        .into_iter()
        .fold(LifecycleHandlers::new(), |handlers, event| {
            handlers.on(event, recording(log, &format!("{}({})", event, id)))
        })
}
