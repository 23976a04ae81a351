//! Route pattern compilation and matching.
//!
//! A route path such as `/users/:id|[0-9]+/posts/...` compiles into a
//! sequence of [`Segment`]s. Splitting keeps empty segments, so the
//! leading `/` contributes an empty literal and segment counts line up
//! exactly with raw request paths — `/users/` and `/users` are different
//! paths with different segment counts.
//!
//! Embedded regexes compile once, into a [`RegexCache`] owned by the
//! router doing the registering. Compiled regexes are anchored so a match
//! is always a full-string match of the request segment.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::error::RouterError;
use crate::params::{PathParams, WILDCARD_KEY};

/// One compiled unit of a route pattern.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Matches by exact string equality.
    Literal(String),
    /// Binds the request segment under `name`; with a regex, binds only
    /// when the regex matches the whole segment, without one, binds any
    /// non-empty segment.
    Param {
        /// The parameter name bound on a match.
        name: String,
        /// Anchored constraint regex, when written as `:name|regex`.
        regex: Option<Arc<Regex>>,
    },
    /// Consumes all remaining request segments.
    Wildcard,
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
    wildcard: bool,
}

impl Pattern {
    /// Compiles a route path.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidRegex`] for an uncompilable
    /// `:name|regex` constraint, [`RouterError::WildcardNotLast`] when a
    /// `...` segment is not final, and [`RouterError::DuplicateParam`]
    /// when the same parameter name appears twice.
    pub fn compile(path: &str, cache: &mut RegexCache) -> Result<Self, RouterError> {
        let parts: Vec<&str> = path.split('/').collect();
        let last = parts.len() - 1;

        let mut segments = Vec::with_capacity(parts.len());
        let mut seen_names: Vec<&str> = Vec::new();

        for (index, part) in parts.iter().enumerate() {
            if *part == "..." {
                if index != last {
                    return Err(RouterError::WildcardNotLast {
                        pattern: path.to_string(),
                    });
                }
                segments.push(Segment::Wildcard);
            } else if let Some(rest) = part.strip_prefix(':') {
                let (name, regex_source) = match rest.split_once('|') {
                    Some((name, source)) => (name, Some(source)),
                    None => (rest, None),
                };
                if seen_names.contains(&name) {
                    return Err(RouterError::DuplicateParam {
                        name: name.to_string(),
                        pattern: path.to_string(),
                    });
                }
                seen_names.push(name);

                let regex = match regex_source {
                    Some(source) => Some(cache.get_or_compile(source)?),
                    None => None,
                };
                segments.push(Segment::Param {
                    name: name.to_string(),
                    regex,
                });
            } else {
                segments.push(Segment::Literal((*part).to_string()));
            }
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
            wildcard: path.ends_with("/..."),
        })
    }

    /// Matches request path segments against this pattern, left to right.
    ///
    /// Returns the bound parameters on success. The first failing segment
    /// aborts the whole match; no partial bindings escape.
    #[must_use]
    pub fn match_path(&self, segments: &[&str]) -> Option<PathParams> {
        if !self.wildcard && segments.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();

        for (index, segment) in self.segments.iter().enumerate() {
            let Some(&actual) = segments.get(index) else {
                return None;
            };

            match segment {
                Segment::Wildcard => {
                    params.push(WILDCARD_KEY, segments[index..].join("/"));
                    return Some(params);
                }
                Segment::Param {
                    name,
                    regex: Some(regex),
                } => {
                    if !regex.is_match(actual) {
                        return None;
                    }
                    params.push(name.clone(), actual);
                }
                Segment::Param { name, regex: None } => {
                    if actual.is_empty() {
                        return None;
                    }
                    params.push(name.clone(), actual);
                }
                Segment::Literal(expected) => {
                    if expected.as_str() != actual {
                        return None;
                    }
                }
            }
        }

        Some(params)
    }

    /// The pattern text as registered.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns `true` for patterns ending in `/...`.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// The compiled segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Compiled-regex cache, keyed by regex source text.
///
/// Owned by a single [`Router`](crate::Router); populated during
/// registration and read-only while serving. Re-registering the same
/// source text reuses the existing entry.
#[derive(Debug, Default)]
pub struct RegexCache {
    compiled: HashMap<String, Arc<Regex>>,
}

impl RegexCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled, anchored regex for `source`, compiling and
    /// caching it on first sight.
    pub fn get_or_compile(&mut self, source: &str) -> Result<Arc<Regex>, RouterError> {
        if let Some(regex) = self.compiled.get(source) {
            return Ok(Arc::clone(regex));
        }

        // Anchor so a match always covers the whole request segment.
        let anchored = format!("^(?:{source})$");
        let regex = Regex::new(&anchored).map_err(|error| RouterError::InvalidRegex {
            source_text: source.to_string(),
            source: Box::new(error),
        })?;

        let regex = Arc::new(regex);
        self.compiled
            .insert(source.to_string(), Arc::clone(&regex));
        Ok(regex)
    }

    /// Returns the number of distinct cached regexes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    /// Returns `true` when nothing has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}
