//! Validation helpers for request handlers.
//!
//! A [`Validator`] accumulates failures while a handler inspects its
//! input: field errors keyed by field name (the first error per field
//! wins) and deduplicated non-field errors for cross-field conditions.
//! The free functions are predicates meant to be fed to
//! [`Validator::check`].
//!
//! ```rust
//! use trivium_validate::{max_chars, Validator};
//!
//! let name = "ada";
//! let mut v = Validator::new();
//! v.check(!name.is_empty(), "name", "must not be blank");
//! v.check(max_chars(name, 50), "name", "must be at most 50 characters");
//!
//! assert!(v.ok());
//! ```

use std::collections::HashMap;
use std::hash::Hash;

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a reasonable subset of RFC 5322 addresses.
pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex must compile")
});

/// Accumulates validation failures.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    field_errors: HashMap<String, String>,
    non_field_errors: Vec<String>,
}

impl Validator {
    /// Creates a validator with no recorded failures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when no failures have been recorded.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    /// Records a field error when `condition` is false.
    pub fn check(&mut self, condition: bool, field: &str, message: &str) {
        if !condition {
            self.add_field_error(field, message);
        }
    }

    /// Records an error against `field`. The first error per field is
    /// kept; later ones are ignored.
    pub fn add_field_error(&mut self, field: &str, message: &str) {
        self.field_errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Records an error not tied to any field. Duplicate messages are
    /// ignored.
    pub fn add_non_field_error(&mut self, message: &str) {
        if !self.non_field_errors.iter().any(|m| m == message) {
            self.non_field_errors.push(message.to_string());
        }
    }

    /// The recorded field errors.
    #[must_use]
    pub fn field_errors(&self) -> &HashMap<String, String> {
        &self.field_errors
    }

    /// The recorded non-field errors.
    #[must_use]
    pub fn non_field_errors(&self) -> &[String] {
        &self.non_field_errors
    }
}

/// Returns `true` when `value` is one of `allowed`.
pub fn one_of<T: PartialEq>(value: &T, allowed: &[T]) -> bool {
    allowed.contains(value)
}

/// Returns `true` when `value` has at most `limit` characters
/// (Unicode scalar values, not bytes).
#[must_use]
pub fn max_chars(value: &str, limit: usize) -> bool {
    value.chars().count() <= limit
}

/// Returns `true` when `value` has at least `limit` characters.
#[must_use]
pub fn min_chars(value: &str, limit: usize) -> bool {
    value.chars().count() >= limit
}

/// Returns `true` when the character count of `value` lies in
/// `min..=max`.
#[must_use]
pub fn chars_in_range(value: &str, min: usize, max: usize) -> bool {
    min_chars(value, min) && max_chars(value, max)
}

/// Returns `true` when `value` is at most `limit` bytes long.
#[must_use]
pub fn max_bytes(value: &str, limit: usize) -> bool {
    value.len() <= limit
}

/// Returns `true` when `value` is at least `limit` bytes long.
#[must_use]
pub fn min_bytes(value: &str, limit: usize) -> bool {
    value.len() >= limit
}

/// Returns `true` when the byte length of `value` lies in `min..=max`.
#[must_use]
pub fn bytes_in_range(value: &str, min: usize, max: usize) -> bool {
    min_bytes(value, min) && max_bytes(value, max)
}

/// Returns `true` when `regex` matches `value`.
#[must_use]
pub fn matches(value: &str, regex: &Regex) -> bool {
    regex.is_match(value)
}

/// Returns `true` when `value` looks like an email address.
#[must_use]
pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Returns `true` when all `values` are distinct.
pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = std::collections::HashSet::with_capacity(values.len());
    values.iter().all(|v| seen.insert(v))
}
