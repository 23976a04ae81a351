//! # Trivium
//!
//! An embeddable HTTP request router for server processes that need
//! fast, allocation-light routing without a full web framework.
//!
//! - **Ordered pattern matching** — literals, `:name` parameters,
//!   `:name|regex` constrained parameters, and `/...` wildcard tails;
//!   first registered match wins.
//! - **Middleware composition** — handler-transforming functions, folded
//!   once at registration; first-declared runs outermost.
//! - **Method negotiation** — correct 404 vs 405 vs 204 semantics with
//!   an `Allow` header, all three fallbacks replaceable.
//! - **Server lifecycle** — listen, serve on tokio/hyper, graceful
//!   shutdown on SIGTERM/SIGINT with a bounded drain and forced-close
//!   fallback.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use trivium::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut router = Router::new();
//!     router.get(
//!         "/users/:id|[0-9]+",
//!         handler_fn(|ctx, _request| async move {
//!             let id = ctx.param("id").unwrap_or_default().to_string();
//!             Response::new(Full::new(Bytes::from(id)))
//!         }),
//!     )?;
//!
//!     Server::bind("0.0.0.0:8080")
//!         .timeout(Duration::from_secs(30))
//!         .run(router)
//!         .await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

pub use trivium_router as router;

pub use trivium_server as server;

pub use trivium_config as config;

pub use trivium_validate as validate;

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use trivium_config::Config;
    pub use trivium_router::{
        handler_fn, middleware_fn, Handler, Middleware, PathParams, Request, RequestContext,
        Response, Router, RouterError, TraceId,
    };
    pub use trivium_server::{init_logging, LogConfig, Server, ShutdownSignal};
    pub use trivium_validate::Validator;
}
