//! Handler types.
//!
//! A handler is an async function from a [`RequestContext`] and an HTTP
//! request to an HTTP response. Handlers are stored type-erased behind
//! [`Handler`] so routes, middleware, and fallbacks all share one shape.
//!
//! Request bodies arrive pre-collected as [`Bytes`]; the router does not
//! parse them. Responses carry a [`Full`] body.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;

use crate::context::RequestContext;

/// The request type handlers receive.
pub type Request = http::Request<Bytes>;

/// The response type handlers produce.
pub type Response = http::Response<Full<Bytes>>;

/// A boxed future, the return type of type-erased handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A shared, type-erased request handler.
///
/// Cloning a `Handler` is cheap (an `Arc` bump); routes registered for
/// several methods share one handler.
pub type Handler =
    Arc<dyn Fn(RequestContext, Request) -> BoxFuture<'static, Response> + Send + Sync>;

/// Builds a [`Handler`] from an async function or closure.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use http_body_util::Full;
/// use trivium_router::{handler_fn, Response};
///
/// let handler = handler_fn(|ctx, _request| async move {
///     let body = format!("hello, {}", ctx.param("name").unwrap_or("world"));
///     Response::new(Full::new(Bytes::from(body)))
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> Handler
where
    F: Fn(RequestContext, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |ctx, request| Box::pin(f(ctx, request)))
}

/// Builds a plain-text response with the given status.
pub(crate) fn plain_response(status: http::StatusCode, body: impl Into<Bytes>) -> Response {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
}
