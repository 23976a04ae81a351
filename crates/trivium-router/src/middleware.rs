//! Middleware composition.
//!
//! A middleware is a function transforming one [`Handler`] into another,
//! used to layer cross-cutting behavior (logging, auth, tracing) around
//! terminal handlers.
//!
//! # Ordering contract
//!
//! Composition is LIFO relative to declaration order: the chain is folded
//! right-to-left over the handler, so the **first-declared middleware is
//! the outermost wrapper** — it runs first on the way in and last on the
//! way out. This ordering is part of the public contract, not an
//! implementation detail.
//!
//! Composition happens once, when a route is registered. The handler
//! stored on each route is the final composed callable; dispatch never
//! re-wraps.

use std::sync::Arc;

use crate::handler::Handler;

/// A shared, type-erased handler transformer.
pub type Middleware = Arc<dyn Fn(Handler) -> Handler + Send + Sync>;

/// Builds a [`Middleware`] from a function or closure.
///
/// # Example
///
/// ```rust
/// use trivium_router::{handler_fn, middleware_fn, Handler};
///
/// let logging = middleware_fn(|next: Handler| {
///     handler_fn(move |ctx, request| {
///         let next = next.clone();
///         async move {
///             tracing::info!(trace_id = %ctx.trace_id(), path = %request.uri().path(), "request");
///             next(ctx, request).await
///         }
///     })
/// });
/// ```
pub fn middleware_fn<F>(f: F) -> Middleware
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Folds `middlewares` around `handler`, first-declared outermost.
pub(crate) fn compose(middlewares: &[Middleware], handler: Handler) -> Handler {
    middlewares
        .iter()
        .rev()
        .fold(handler, |inner, middleware| middleware(inner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{handler_fn, plain_response};
    use crate::RequestContext;
    use bytes::Bytes;
    use http::StatusCode;
    use std::sync::Mutex;

    fn recording_middleware(log: Arc<Mutex<Vec<String>>>, name: &'static str) -> Middleware {
        middleware_fn(move |next: Handler| {
            let log = Arc::clone(&log);
            handler_fn(move |ctx, request| {
                let next = next.clone();
                let log = Arc::clone(&log);
                async move {
                    log.lock().unwrap().push(format!("{name}:in"));
                    let response = next(ctx, request).await;
                    log.lock().unwrap().push(format!("{name}:out"));
                    response
                }
            })
        })
    }

    fn terminal(log: Arc<Mutex<Vec<String>>>) -> Handler {
        handler_fn(move |_ctx, _request| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push("handler".to_string());
                plain_response(StatusCode::OK, "ok")
            }
        })
    }

    #[tokio::test]
    async fn test_first_declared_is_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![
            recording_middleware(Arc::clone(&log), "first"),
            recording_middleware(Arc::clone(&log), "second"),
        ];

        let wrapped = compose(&chain, terminal(Arc::clone(&log)));
        let request = http::Request::builder()
            .uri("/")
            .body(Bytes::new())
            .unwrap();
        wrapped(RequestContext::empty(), request).await;

        assert_eq!(
            *log.lock().unwrap(),
            ["first:in", "second:in", "handler", "second:out", "first:out"],
        );
    }

    #[tokio::test]
    async fn test_empty_chain_is_identity() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let wrapped = compose(&[], terminal(Arc::clone(&log)));

        let request = http::Request::builder()
            .uri("/")
            .body(Bytes::new())
            .unwrap();
        let response = wrapped(RequestContext::empty(), request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*log.lock().unwrap(), vec!["handler".to_string()]);
    }

    #[tokio::test]
    async fn test_middleware_can_short_circuit() {
        let gate = middleware_fn(|_next: Handler| {
            handler_fn(|_ctx, _request| async {
                plain_response(StatusCode::FORBIDDEN, "denied")
            })
        });

        let log = Arc::new(Mutex::new(Vec::new()));
        let wrapped = compose(&[gate], terminal(Arc::clone(&log)));

        let request = http::Request::builder()
            .uri("/")
            .body(Bytes::new())
            .unwrap();
        let response = wrapped(RequestContext::empty(), request).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(log.lock().unwrap().is_empty());
    }
}
