//! Path parameter storage.
//!
//! Parameters extracted from a matched route are stored as (name, value)
//! pairs with a small-vector optimization so the common case of a handful
//! of parameters stays off the heap.

use smallvec::SmallVec;

/// Number of parameters stored inline before spilling to the heap.
const INLINE_PARAMS: usize = 4;

/// The key under which a wildcard route binds the remaining path tail.
///
/// A route registered as `/files/...` binds everything after `/files/` to
/// this key, rejoined with `/`.
pub const WILDCARD_KEY: &str = "...";

/// Parameters bound by a successful route match.
///
/// # Example
///
/// ```rust
/// use trivium_router::PathParams;
///
/// let mut params = PathParams::new();
/// params.push("id", "42");
///
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathParams {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl PathParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value bound under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the wildcard tail bound by a `/...` route, if any.
    #[must_use]
    pub fn wildcard(&self) -> Option<&str> {
        self.get(WILDCARD_KEY)
    }

    /// Returns the number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no parameters are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over (name, value) pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
