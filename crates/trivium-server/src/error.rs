//! Server error types.

use std::net::SocketAddr;

use thiserror::Error;

/// Errors surfaced by the server lifecycle.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listen address could not be parsed.
    #[error("invalid listen address {addr:?}")]
    InvalidAddress {
        /// The address string as given.
        addr: String,
        /// The parse failure.
        #[source]
        source: std::net::AddrParseError,
    },

    /// Binding the listener failed.
    #[error("failed to bind {addr}")]
    Bind {
        /// The resolved socket address.
        addr: SocketAddr,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The logging subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}
