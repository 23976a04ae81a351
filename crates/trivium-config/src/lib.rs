//! File-backed key-value configuration for Trivium processes.
//!
//! A deliberately small configuration layer: a flat `KEY=value` file, a
//! thread-safe in-memory store, and typed accessors that return errors —
//! never panic — when a key is missing or a value does not convert.
//!
//! ```rust
//! use std::time::Duration;
//! use trivium_config::Config;
//!
//! let config = Config::parse("ADDR=0.0.0.0:8080\nTIMEOUT=30s\n");
//! assert_eq!(config.string("ADDR").unwrap(), "0.0.0.0:8080");
//! assert_eq!(config.duration("TIMEOUT").unwrap(), Duration::from_secs(30));
//! ```

mod error;
mod store;

pub use error::ConfigError;
pub use store::Config;
