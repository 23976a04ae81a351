//! Ordered pattern-matching HTTP router core.
//!
//! This crate is the heart of Trivium: an embeddable router that selects
//! a handler for an incoming path and method, extracts path parameters,
//! applies a composed middleware chain, and negotiates method/OPTIONS
//! semantics when the path matches but the verb does not.
//!
//! # Pattern syntax
//!
//! - `/users/list` — literal segments.
//! - `/users/:id` — `:name` binds a parameter to any non-empty segment.
//! - `/users/:id|[0-9]+` — `:name|regex` binds only when the regex
//!   matches the whole segment.
//! - `/files/...` — a trailing `...` consumes the remaining segments and
//!   binds them under the `"..."` key.
//!
//! # Dispatch semantics
//!
//! Routes are scanned in registration order; the first route matching
//! both path and method wins. When some route matches the path but none
//! matches the method, the response carries an `Allow` header and either
//! the OPTIONS handler (204) or the MethodNotAllowed handler (405) runs.
//! When nothing matches the path, the NotFound handler (404) runs. All
//! three fallbacks are replaceable. Every response carries an
//! `x-trace-id` header with a fresh UUID v7.
//!
//! # Setup phase
//!
//! Register routes and middleware before serving, never concurrently
//! with it — registration takes `&mut Router`, so the borrow checker
//! enforces the phase split. Share the finished router behind an `Arc`.
//!
//! ```text
//!   request ──► dispatch ──► match (in registration order)
//!                  │              │ exact method ──► handler
//!                  │              └ path only ─────► collect Allow
//!                  └ no match ──► 404 / 405 / 204 fallback
//! ```

mod context;
mod error;
mod handler;
mod middleware;
mod params;
mod pattern;
mod router;

pub use context::{RequestContext, TraceId};
pub use error::RouterError;
pub use handler::{handler_fn, BoxFuture, Handler, Request, Response};
pub use middleware::{middleware_fn, Middleware};
pub use params::{PathParams, WILDCARD_KEY};
pub use pattern::{Pattern, RegexCache, Segment};
pub use router::{Group, Router, TRACE_ID_HEADER};
