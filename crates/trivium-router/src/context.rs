//! Per-request context.
//!
//! A [`RequestContext`] is created by the dispatcher for every incoming
//! request and handed to the matched handler (or fallback handler). It is
//! owned exclusively by that request and dropped when the request
//! completes.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::params::PathParams;

/// A unique trace identifier, generated fresh for each request.
///
/// Uses UUID v7, which is time-ordered and therefore sorts well in logs
/// and trace stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generates a new trace id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps an existing UUID, e.g. one parsed from an incoming header.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request-scoped state available to handlers and middleware.
///
/// Carries the bound path parameters, the trace id, and the instant at
/// which dispatch began.
///
/// # Example
///
/// ```rust
/// use trivium_router::{PathParams, RequestContext};
///
/// let mut params = PathParams::new();
/// params.push("id", "42");
///
/// let ctx = RequestContext::new(params);
/// assert_eq!(ctx.param("id"), Some("42"));
/// assert_eq!(ctx.param("missing"), None);
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    trace_id: TraceId,
    started_at: Instant,
    params: PathParams,
}

impl RequestContext {
    /// Creates a context with a fresh trace id and the given parameters.
    #[must_use]
    pub fn new(params: PathParams) -> Self {
        Self::with_trace(TraceId::new(), Instant::now(), params)
    }

    /// Creates a context with explicit trace metadata.
    ///
    /// The dispatcher uses this so the trace id in the context matches the
    /// one written to the response header.
    #[must_use]
    pub(crate) fn with_trace(trace_id: TraceId, started_at: Instant, params: PathParams) -> Self {
        Self {
            trace_id,
            started_at,
            params,
        }
    }

    /// Creates an empty context, useful in handler unit tests.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(PathParams::new())
    }

    /// Returns the value bound to a path parameter, or `None` if the
    /// pattern did not bind that name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Returns the wildcard tail bound by a `/...` route, if any.
    #[must_use]
    pub fn wildcard(&self) -> Option<&str> {
        self.params.wildcard()
    }

    /// Returns all bound parameters.
    #[must_use]
    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Returns the trace id for this request.
    #[must_use]
    pub fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// Returns the instant at which dispatch began.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the time elapsed since dispatch began.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::empty()
    }
}
