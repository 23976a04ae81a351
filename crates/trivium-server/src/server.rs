//! HTTP server lifecycle: listen, serve, graceful shutdown.
//!
//! The server owns a [`Router`] for the life of the process and runs two
//! concurrent activities — the accept loop and the interrupt watcher —
//! racing in a single `select!`. Whichever finishes first decides the
//! control path; the loser does not outlive the call.
//!
//! On shutdown, in-flight HTTP/1 connections are asked to finish within a
//! fixed five-second window; connections still open after the window are
//! force-closed.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use trivium_router::Router;
//! use trivium_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), trivium_server::ServerError> {
//!     let mut router = Router::new();
//!     // ... register routes ...
//!
//!     Server::bind("0.0.0.0:8080")
//!         .timeout(Duration::from_secs(30))
//!         .run(router)
//!         .await
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;

use trivium_router::{Response, Router};

use crate::error::ServerError;
use crate::shutdown::ShutdownSignal;

/// How long in-flight connections get to finish after shutdown triggers.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Default bound on header read, body read, and handler execution.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Server configuration, prior to binding.
#[derive(Debug, Clone)]
pub struct Server {
    addr: String,
    timeout: Duration,
}

impl Server {
    /// Configures a server for the given listen address.
    #[must_use]
    pub fn bind(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout, bounding header read, body read, and
    /// handler execution alike.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Binds the listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidAddress`] for an unparseable address
    /// and [`ServerError::Bind`] when binding fails.
    pub async fn listen(self) -> Result<BoundServer, ServerError> {
        let addr: SocketAddr = self
            .addr
            .parse()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.addr.clone(),
                source,
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr,
            source,
        })?;

        tracing::info!(%local_addr, "listening");

        Ok(BoundServer {
            listener,
            local_addr,
            timeout: self.timeout,
        })
    }

    /// Binds and serves until SIGTERM/SIGINT, then shuts down gracefully.
    ///
    /// Blocks for the life of the process. Returns the terminal error, or
    /// `Ok(())` after a shutdown.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Server::listen`].
    pub async fn run(self, router: Router) -> Result<(), ServerError> {
        let bound = self.listen().await?;
        bound.serve(router, ShutdownSignal::with_os_signals()).await
    }
}

/// A server whose listener is bound and ready to serve.
#[derive(Debug)]
pub struct BoundServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    timeout: Duration,
}

impl BoundServer {
    /// The address the listener actually bound, useful with port 0.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves requests until `shutdown` triggers.
    ///
    /// Each accepted connection runs as its own task. After shutdown
    /// triggers, the accept loop stops and in-flight connections get a
    /// five-second grace window to finish; stragglers are aborted.
    ///
    /// # Errors
    ///
    /// Currently infallible after binding: accept failures are logged and
    /// the loop continues. The `Result` is the stable contract for future
    /// fatal serve errors.
    pub async fn serve(
        self,
        router: Router,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let router = Arc::new(router);
        let mut connections: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, remote_addr)) => {
                            let router = Arc::clone(&router);
                            let shutdown = shutdown.clone();
                            let timeout = self.timeout;
                            connections.spawn(async move {
                                serve_connection(stream, remote_addr, router, timeout, shutdown)
                                    .await;
                            });
                        }
                        Err(error) => {
                            tracing::error!(%error, "failed to accept connection");
                        }
                    }
                }

                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, no longer accepting");
                    break;
                }
            }
        }

        drop(self.listener);

        tracing::info!(
            active = connections.len(),
            grace = ?SHUTDOWN_GRACE,
            "draining connections"
        );

        let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
            while connections.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                active = connections.len(),
                "graceful shutdown timed out, force-closing remaining connections"
            );
            connections.abort_all();
            while connections.join_next().await.is_some() {}
        }

        tracing::info!("server stopped");
        Ok(())
    }
}

/// Serves one connection, honoring graceful shutdown.
async fn serve_connection(
    stream: TcpStream,
    remote_addr: SocketAddr,
    router: Arc<Router>,
    timeout: Duration,
    shutdown: ShutdownSignal,
) {
    let io = TokioIo::new(stream);
    let service = service_fn(move |request: http::Request<Incoming>| {
        let router = Arc::clone(&router);
        async move { handle_request(&router, request, timeout).await }
    });

    let connection = http1::Builder::new()
        .timer(TokioTimer::new())
        .header_read_timeout(timeout)
        .serve_connection(io, service);
    let mut connection = pin!(connection);

    tokio::select! {
        result = connection.as_mut() => {
            if let Err(error) = result {
                tracing::debug!(%remote_addr, %error, "connection closed with error");
            }
        }
        () = shutdown.recv() => {
            connection.as_mut().graceful_shutdown();
            if let Err(error) = connection.await {
                tracing::debug!(%remote_addr, %error, "connection error during shutdown");
            }
        }
    }
}

/// Collects the body and hands the request to the router.
async fn handle_request(
    router: &Router,
    request: http::Request<Incoming>,
    timeout: Duration,
) -> Result<Response, Infallible> {
    let (parts, body) = request.into_parts();

    let body = match tokio::time::timeout(timeout, body.collect()).await {
        Ok(Ok(collected)) => collected.to_bytes(),
        Ok(Err(error)) => {
            tracing::warn!(%error, "failed to read request body");
            return Ok(status_response(
                StatusCode::BAD_REQUEST,
                "failed to read request body\n",
            ));
        }
        Err(_) => {
            tracing::warn!("request body read timed out");
            return Ok(status_response(
                StatusCode::REQUEST_TIMEOUT,
                "request body read timed out\n",
            ));
        }
    };

    let request = http::Request::from_parts(parts, body);

    match tokio::time::timeout(timeout, router.dispatch(request)).await {
        Ok(response) => Ok(response),
        Err(_) => {
            tracing::warn!("handler timed out");
            Ok(status_response(
                StatusCode::GATEWAY_TIMEOUT,
                "request timed out\n",
            ))
        }
    }
}

fn status_response(status: StatusCode, body: &'static str) -> Response {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
}
