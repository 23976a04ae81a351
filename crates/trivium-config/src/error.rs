//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the configuration store.
///
/// Lookup and conversion failures are ordinary errors here — callers that
/// want a lenient read use the `*_or` accessors instead.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The requested key is not present in the store.
    #[error("unknown key {key:?}")]
    UnknownKey {
        /// The missing key.
        key: String,
    },

    /// The value could not be converted to the requested type.
    #[error("key {key:?} value {value:?} is not a valid {expected}")]
    InvalidValue {
        /// The key whose value failed conversion.
        key: String,
        /// The raw value text.
        value: String,
        /// The type that was requested (e.g. "integer").
        expected: &'static str,
    },

    /// The backing file could not be read.
    #[error("failed to read configuration file {path}")]
    Read {
        /// The file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn unknown_key(key: &str) -> Self {
        Self::UnknownKey {
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid_value(key: &str, value: &str, expected: &'static str) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}
