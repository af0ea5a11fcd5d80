use thiserror::Error;

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Failures raised by the lifecycle crate itself.
///
/// Errors coming out of handlers or their loaders never show up here: they are
/// logged and absorbed by the event executor.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Two registered workspaces share the same id.
    #[error("Duplicate workspace id: {id}")]
    DuplicateWorkspace { id: String },

    /// A lock guarding monitor state was poisoned by a panicking holder.
    #[error("transition monitor state poisoned")]
    StatePoisoned,
}
