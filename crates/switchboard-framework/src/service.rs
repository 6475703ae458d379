//! Tower integration for the router.
//!
//! [`RouterService`] implements `tower::Service<InboundEvent>`, so the router
//! can sit behind ordinary tower layers:
//!
//! ```rust,ignore
//! use tower::ServiceBuilder;
//! use tower::limit::ConcurrencyLimitLayer;
//!
//! let service = ServiceBuilder::new()
//!     .layer(ConcurrencyLimitLayer::new(1))
//!     .service(router.into_service());
//! ```

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use tower::Service;

use crate::router::{DispatchOutcome, Router};
use switchboard_core::{BoxedSession, InboundMessage};

/// A message together with the session it arrived on.
#[derive(Clone)]
pub struct InboundEvent {
    pub session: BoxedSession,
    pub message: InboundMessage,
}

impl InboundEvent {
    pub fn new(session: BoxedSession, message: InboundMessage) -> Self {
        Self { session, message }
    }
}

/// A cloneable tower service wrapping a shared [`Router`].
#[derive(Clone, Debug)]
pub struct RouterService {
    router: Arc<Router>,
}

impl RouterService {
    /// Wraps an already shared router.
    pub fn new(router: Arc<Router>) -> Self {
        Self { router }
    }

    /// Returns the wrapped router.
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }
}

impl Service<InboundEvent> for RouterService {
    type Response = DispatchOutcome;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, event: InboundEvent) -> Self::Future {
        let router = Arc::clone(&self.router);

        Box::pin(async move { Ok(router.handle(event.session, event.message).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::SimpleCommand;
    use crate::test_util::MockSession;
    use tokio_test::assert_ready_ok;
    use tokio_test::task;
    use tower::ServiceExt;

    fn service() -> RouterService {
        let mut router = Router::new("!").unwrap();
        router.register_simple([SimpleCommand::new("ping", "pong", "")]);
        router.into_service()
    }

    #[test]
    fn test_always_ready() {
        let mut svc = service();
        let mut ready = task::spawn(std::future::poll_fn(|cx| svc.poll_ready(cx)));
        assert_ready_ok!(ready.poll());
    }

    #[tokio::test]
    async fn test_oneshot_routes_event() {
        let session = Arc::new(MockSession::new());
        let event = InboundEvent::new(session.clone(), InboundMessage::new("u1", "g1", "c1", "!ping"));

        let outcome = service().oneshot(event).await.unwrap();

        assert_eq!(outcome, DispatchOutcome::Simple);
        assert_eq!(session.replies(), vec!["pong"]);
    }

    #[tokio::test]
    async fn test_clones_share_router() {
        let svc = service();
        let other = svc.clone();
        assert!(Arc::ptr_eq(svc.router(), other.router()));

        let session = Arc::new(MockSession::new());
        let outcome = other
            .oneshot(InboundEvent::new(
                session.clone(),
                InboundMessage::new("u1", "g1", "c1", "hello"),
            ))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Ignored(crate::router::Filter::MissingPrefix)
        );
    }
}
