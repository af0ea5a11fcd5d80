use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::context::TransitionContext;

/// A function run at one phase of a workspace transition.
///
/// Handlers should poll `context.is_cancelled()` during long work and return
/// early once a newer transition has superseded theirs. Returned errors are
/// logged and never block navigation.
#[async_trait]
pub trait LifecycleHandler: Send + Sync {
    async fn handle(&self, context: TransitionContext) -> Result<()>;
}

/// Deferred accessor resolving to a handler, invoked the first time its
/// event fires for a workspace.
#[async_trait]
pub trait HandlerLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn LifecycleHandler>>;
}

pub struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> LifecycleHandler for FnHandler<F>
where
    F: Fn(TransitionContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn handle(&self, context: TransitionContext) -> Result<()> {
        (self.0)(context).await
    }
}

/// Wraps an async closure as a handler.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn LifecycleHandler>
where
    F: Fn(TransitionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

pub struct FnLoader<F>(F);

#[async_trait]
impl<F, Fut> HandlerLoader for FnLoader<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Arc<dyn LifecycleHandler>>> + Send + 'static,
{
    async fn load(&self) -> Result<Arc<dyn LifecycleHandler>> {
        (self.0)().await
    }
}

/// Wraps an async closure as a loader.
pub fn loader_fn<F, Fut>(f: F) -> Arc<dyn HandlerLoader>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Arc<dyn LifecycleHandler>>> + Send + 'static,
{
    Arc::new(FnLoader(f))
}

struct ReadyLoader(Arc<dyn LifecycleHandler>);

#[async_trait]
impl HandlerLoader for ReadyLoader {
    async fn load(&self) -> Result<Arc<dyn LifecycleHandler>> {
        Ok(Arc::clone(&self.0))
    }
}

/// A loader that resolves immediately to an already constructed handler.
pub fn ready(handler: Arc<dyn LifecycleHandler>) -> Arc<dyn HandlerLoader> {
    Arc::new(ReadyLoader(handler))
}
