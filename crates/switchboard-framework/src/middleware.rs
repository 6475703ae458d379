//! Fire-and-forget middleware.
//!
//! Middleware observes every dispatch that makes it past the rate limiter.
//! Each middleware call is spawned as its own task: middleware cannot block,
//! deny or reorder a dispatch, and runs concurrently with the handler.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::context::DispatchContext;

/// A type-erased middleware function.
pub type Middleware = Arc<dyn Fn(Arc<DispatchContext>) -> BoxFuture<'static, ()> + Send + Sync>;

/// Converts an async function into a [`Middleware`].
///
/// ```rust,ignore
/// let mw = into_middleware(|ctx: Arc<DispatchContext>| async move {
///     tracing::info!(command = ctx.command(), "Command received");
/// });
/// ```
pub fn into_middleware<F, Fut>(f: F) -> Middleware
where
    F: Fn(Arc<DispatchContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |ctx| f(ctx).boxed())
}
