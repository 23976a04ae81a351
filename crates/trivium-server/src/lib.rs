//! Server lifecycle for Trivium.
//!
//! Binds a TCP listener, serves HTTP/1 via hyper with a
//! [`Router`](trivium_router::Router) as the request handler, and on
//! SIGTERM/SIGINT performs a bounded graceful shutdown, falling back to a
//! forced close of whatever connections remain.
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use trivium_router::Router;
//! use trivium_server::{init_logging, LogConfig, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), trivium_server::ServerError> {
//!     init_logging(&LogConfig::default())?;
//!
//!     let mut router = Router::new();
//!     // ... register routes ...
//!
//!     Server::bind("0.0.0.0:8080")
//!         .timeout(Duration::from_secs(30))
//!         .run(router)
//!         .await
//! }
//! ```

mod error;
mod logging;
mod server;
mod shutdown;

pub use error::ServerError;
pub use logging::{init_logging, LogConfig};
pub use server::{BoundServer, Server};
pub use shutdown::ShutdownSignal;
