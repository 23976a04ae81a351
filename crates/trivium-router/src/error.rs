//! Registration error types.
//!
//! All misconfiguration is reported when a route is registered, before the
//! server starts accepting traffic. Dispatch itself never fails.

use thiserror::Error;

/// Errors raised while registering a route.
#[derive(Error, Debug)]
pub enum RouterError {
    /// A `:name|regex` segment carried a regex that failed to compile.
    #[error("invalid regex {source_text:?}")]
    InvalidRegex {
        /// The regex source text as written in the pattern.
        source_text: String,
        /// The compilation failure.
        #[source]
        source: Box<regex::Error>,
    },

    /// A `...` segment appeared somewhere other than the final position.
    #[error("wildcard segment must be the last segment in pattern {pattern:?}")]
    WildcardNotLast {
        /// The offending route pattern.
        pattern: String,
    },

    /// The same parameter name was bound twice within one pattern.
    #[error("duplicate parameter {name:?} in pattern {pattern:?}")]
    DuplicateParam {
        /// The repeated parameter name.
        name: String,
        /// The offending route pattern.
        pattern: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_regex_display() {
        let source = regex::Regex::new("[").unwrap_err();
        let err = RouterError::InvalidRegex {
            source_text: "[".to_string(),
            source: Box::new(source),
        };
        assert!(err.to_string().contains('['));
    }

    #[test]
    fn test_wildcard_not_last_display() {
        let err = RouterError::WildcardNotLast {
            pattern: "/files/.../extra".to_string(),
        };
        assert!(err.to_string().contains("/files/.../extra"));
    }

    #[test]
    fn test_duplicate_param_display() {
        let err = RouterError::DuplicateParam {
            name: "id".to_string(),
            pattern: "/users/:id/:id".to_string(),
        };
        assert!(err.to_string().contains("id"));
        assert!(err.to_string().contains("/users/:id/:id"));
    }
}
