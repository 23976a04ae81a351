//! The router: route table, registration, and request dispatch.
//!
//! Routes are registered during a single-threaded setup phase (`&mut
//! self`) and the table is read-only while serving; share the finished
//! router behind an `Arc`. Registration order is the precedence
//! tie-break: the first registered route that matches both path and
//! method wins.

use std::sync::Arc;
use std::time::Instant;

use http::header::{HeaderValue, ALLOW};
use http::{HeaderName, Method, StatusCode};

use crate::context::{RequestContext, TraceId};
use crate::error::RouterError;
use crate::handler::{handler_fn, plain_response, Handler, Request, Response};
use crate::middleware::{compose, Middleware};
use crate::params::PathParams;
use crate::pattern::{Pattern, RegexCache};

/// Response header carrying the per-request trace id.
pub const TRACE_ID_HEADER: HeaderName = HeaderName::from_static("x-trace-id");

/// The nine standard HTTP methods a bare `handle` call registers for.
const ALL_METHODS: [Method; 9] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::CONNECT,
    Method::OPTIONS,
    Method::TRACE,
];

/// One registered route: a method, a compiled pattern, and the fully
/// composed handler. Immutable once constructed.
struct Route {
    method: Method,
    pattern: Arc<Pattern>,
    handler: Handler,
}

/// Replaceable fallback handlers for the three miss outcomes.
struct Fallbacks {
    not_found: Handler,
    method_not_allowed: Handler,
    options: Handler,
}

impl Fallbacks {
    fn defaults() -> Self {
        Self {
            not_found: default_not_found(),
            method_not_allowed: default_method_not_allowed(),
            options: default_options(),
        }
    }

    fn composed(&self, middlewares: &[Middleware]) -> Self {
        Self {
            not_found: compose(middlewares, self.not_found.clone()),
            method_not_allowed: compose(middlewares, self.method_not_allowed.clone()),
            options: compose(middlewares, self.options.clone()),
        }
    }
}

/// An ordered-scan HTTP router with middleware composition and
/// method/OPTIONS negotiation.
///
/// # Pattern syntax
///
/// - `/users/list` — literal segments, exact equality.
/// - `/users/:id` — binds `id` to any non-empty segment.
/// - `/users/:id|[0-9]+` — binds `id` only when the regex matches the
///   whole segment.
/// - `/files/...` — wildcard: consumes the remaining segments, binding
///   them (rejoined with `/`) under the `"..."` key.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use http::Method;
/// use http_body_util::Full;
/// use trivium_router::{handler_fn, Response, Router};
///
/// let mut router = Router::new();
/// router.handle(
///     "/users/:id",
///     handler_fn(|ctx, _request| async move {
///         let id = ctx.param("id").unwrap_or_default().to_string();
///         Response::new(Full::new(Bytes::from(id)))
///     }),
///     &[Method::GET],
/// )?;
/// # Ok::<(), trivium_router::RouterError>(())
/// ```
pub struct Router {
    routes: Vec<Route>,
    middlewares: Vec<Middleware>,
    cache: RegexCache,
    fallbacks: Fallbacks,
    composed_fallbacks: Fallbacks,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates an empty router with the default fallback handlers.
    #[must_use]
    pub fn new() -> Self {
        let fallbacks = Fallbacks::defaults();
        let composed_fallbacks = fallbacks.composed(&[]);
        Self {
            routes: Vec::new(),
            middlewares: Vec::new(),
            cache: RegexCache::new(),
            fallbacks,
            composed_fallbacks,
        }
    }

    /// Creates a router with an initial router-wide middleware chain.
    #[must_use]
    pub fn with_middlewares(middlewares: Vec<Middleware>) -> Self {
        let mut router = Self::new();
        for middleware in middlewares {
            router.use_middleware(middleware);
        }
        router
    }

    /// Appends a middleware to the router-wide chain.
    ///
    /// Middleware wraps routes registered **after** this call; routes
    /// already registered keep the chain they were composed with.
    /// Fallback handlers are re-composed immediately, so they always
    /// carry the full chain.
    pub fn use_middleware(&mut self, middleware: Middleware) {
        self.middlewares.push(middleware);
        self.composed_fallbacks = self.fallbacks.composed(&self.middlewares);
    }

    /// Replaces the handler invoked when no route matches the path.
    pub fn set_not_found(&mut self, handler: Handler) {
        self.fallbacks.not_found = handler;
        self.composed_fallbacks = self.fallbacks.composed(&self.middlewares);
    }

    /// Replaces the handler invoked when the path matches but the method
    /// does not, for non-OPTIONS requests.
    pub fn set_method_not_allowed(&mut self, handler: Handler) {
        self.fallbacks.method_not_allowed = handler;
        self.composed_fallbacks = self.fallbacks.composed(&self.middlewares);
    }

    /// Replaces the handler invoked for OPTIONS requests whose path
    /// matches some route.
    pub fn set_options(&mut self, handler: Handler) {
        self.fallbacks.options = handler;
        self.composed_fallbacks = self.fallbacks.composed(&self.middlewares);
    }

    /// Registers `handler` for `path` under the given methods.
    ///
    /// GET without HEAD registers HEAD as well (HEAD mirrors GET). An
    /// empty method list registers all nine standard methods. One route
    /// is appended per method; all share the same compiled pattern and
    /// the same handler, composed through the router-wide chain exactly
    /// once, here.
    ///
    /// # Errors
    ///
    /// Returns a [`RouterError`] for an invalid regex constraint, a
    /// misplaced wildcard, or a duplicate parameter name.
    pub fn handle(
        &mut self,
        path: &str,
        handler: Handler,
        methods: &[Method],
    ) -> Result<(), RouterError> {
        let pattern = Arc::new(Pattern::compile(path, &mut self.cache)?);

        let mut methods: Vec<Method> = methods.to_vec();
        if methods.contains(&Method::GET) && !methods.contains(&Method::HEAD) {
            methods.push(Method::HEAD);
        }
        if methods.is_empty() {
            methods = ALL_METHODS.to_vec();
        }

        let handler = compose(&self.middlewares, handler);
        for method in methods {
            self.routes.push(Route {
                method,
                pattern: Arc::clone(&pattern),
                handler: handler.clone(),
            });
        }
        Ok(())
    }

    /// Registers a GET (and HEAD) route.
    pub fn get(&mut self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.handle(path, handler, &[Method::GET])
    }

    /// Registers a POST route.
    pub fn post(&mut self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.handle(path, handler, &[Method::POST])
    }

    /// Registers a PUT route.
    pub fn put(&mut self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.handle(path, handler, &[Method::PUT])
    }

    /// Registers a DELETE route.
    pub fn delete(&mut self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.handle(path, handler, &[Method::DELETE])
    }

    /// Starts a group whose routes get `middlewares` composed between
    /// the router-wide chain and their handlers.
    pub fn group(&mut self, middlewares: Vec<Middleware>) -> Group<'_> {
        Group {
            router: self,
            middlewares,
        }
    }

    /// Returns the number of registered routes (one per method).
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Dispatches one request, driving the full matching and
    /// method-negotiation state machine.
    ///
    /// Exactly one handler runs per request: the first registered route
    /// matching both path and method, or one of the three fallbacks.
    /// Every response carries the `x-trace-id` header.
    pub async fn dispatch(&self, request: Request) -> Response {
        let trace_id = TraceId::new();
        let started_at = Instant::now();

        let path = request.uri().path().to_string();
        let segments: Vec<&str> = path.split('/').collect();

        tracing::debug!(method = %request.method(), path = %path, trace_id = %trace_id, "dispatch");

        let mut allowed: Vec<Method> = Vec::new();

        for route in &self.routes {
            let Some(params) = route.pattern.match_path(&segments) else {
                continue;
            };

            if route.method == request.method() {
                let ctx = RequestContext::with_trace(trace_id, started_at, params);
                let mut response = (route.handler)(ctx, request).await;
                set_trace_header(&mut response, trace_id);
                return response;
            }

            if !allowed.contains(&route.method) {
                allowed.push(route.method.clone());
            }
        }

        let ctx = RequestContext::with_trace(trace_id, started_at, PathParams::new());

        let mut response = if allowed.is_empty() {
            (self.composed_fallbacks.not_found)(ctx, request).await
        } else {
            allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
            let allow_value = allow_header(&allowed);

            let handler = if request.method() == Method::OPTIONS {
                &self.composed_fallbacks.options
            } else {
                &self.composed_fallbacks.method_not_allowed
            };
            let mut response = (handler)(ctx, request).await;
            response.headers_mut().insert(ALLOW, allow_value);
            response
        };

        set_trace_header(&mut response, trace_id);
        response
    }
}

/// Registers routes with an extra middleware chain scoped to the group.
///
/// The group chain sits between the router-wide chain and the terminal
/// handler: router-wide middleware stays outermost.
pub struct Group<'r> {
    router: &'r mut Router,
    middlewares: Vec<Middleware>,
}

impl Group<'_> {
    /// Registers `handler` for `path` under the given methods, wrapped
    /// in the group chain.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Router::handle`].
    pub fn handle(
        &mut self,
        path: &str,
        handler: Handler,
        methods: &[Method],
    ) -> Result<(), RouterError> {
        let handler = compose(&self.middlewares, handler);
        self.router.handle(path, handler, methods)
    }

    /// Registers a GET (and HEAD) route through the group.
    pub fn get(&mut self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.handle(path, handler, &[Method::GET])
    }

    /// Registers a POST route through the group.
    pub fn post(&mut self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.handle(path, handler, &[Method::POST])
    }
}

fn set_trace_header(response: &mut Response, trace_id: TraceId) {
    if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
}

fn allow_header(allowed: &[Method]) -> HeaderValue {
    let mut value = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    value.push_str(", ");
    value.push_str(Method::OPTIONS.as_str());
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("OPTIONS"))
}

fn default_not_found() -> Handler {
    handler_fn(|_ctx, _request| async {
        plain_response(
            StatusCode::NOT_FOUND,
            "the requested resource could not be found\n",
        )
    })
}

fn default_method_not_allowed() -> Handler {
    handler_fn(|_ctx, request: Request| async move {
        plain_response(
            StatusCode::METHOD_NOT_ALLOWED,
            format!(
                "the method {} is not supported for the requested resource\n",
                request.method()
            ),
        )
    })
}

fn default_options() -> Handler {
    handler_fn(|_ctx, _request| async { plain_response(StatusCode::NO_CONTENT, "") })
}
