//! Workspace lifecycle orchestration.
//!
//! Sequences the asynchronous activation and deactivation handlers a
//! workspace registers whenever the active workspace changes: handlers are
//! lazily loaded and cached, each runs under a non-cancelling timeout
//! watchdog, failures are isolated per handler and superseded transitions are
//! signalled through a cooperative cancellation token.

pub mod cache;
pub mod context;
pub mod error;
pub mod executor;
pub mod handler;
pub mod loader;
pub mod monitor;
pub mod orchestrator;
pub mod timeout;
pub mod types;
pub mod workspace;

pub use cache::HandlerCache;
pub use context::TransitionContext;
pub use error::{LifecycleError, LifecycleResult};
pub use executor::{EventExecutor, EventOutcome};
pub use handler::{handler_fn, loader_fn, ready, HandlerLoader, LifecycleHandler};
pub use loader::HandlerResolver;
pub use monitor::TransitionMonitor;
pub use orchestrator::{EventRecord, TransitionOrchestrator, TransitionReport};
pub use timeout::run_with_timeout_warning;
pub use tokio_util::sync::CancellationToken;
pub use types::*;
pub use workspace::{LifecycleHandlers, Workspace, WorkspaceDescriptor, WorkspaceRegistry};
