//! Server announcements and the per-request access log.
//!
//! The connection handler never logs requests directly; it reports to an
//! [`Output`] handed to it at startup. [`TracingOutput`] is the default and
//! turns every call into a `tracing` event.

use std::net::SocketAddr;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::ConnectionError;
use crate::http::{Request, Response};

/// Receives the events worth reporting while serving connections.
pub trait Output: Send + Sync {
    /// The listener is bound and about to accept connections.
    fn greeting(&self, addr: SocketAddr);

    /// A client connected.
    fn new_connection(&self, peer: SocketAddr);

    /// A response was written for `request`.
    fn log_request(&self, peer: SocketAddr, request: &Request, response: &Response, elapsed: Duration);

    /// The connection ended without a response.
    fn connection_failed(&self, peer: SocketAddr, error: &ConnectionError);
}

/// [`Output`] backed by `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingOutput;

impl Output for TracingOutput {
    fn greeting(&self, addr: SocketAddr) {
        info!(address = %addr, "HTTPServe v{} listening", env!("CARGO_PKG_VERSION"));
    }

    fn new_connection(&self, peer: SocketAddr) {
        info!(peer = %peer, "new connection");
    }

    fn log_request(&self, peer: SocketAddr, request: &Request, response: &Response, elapsed: Duration) {
        info!(
            peer = %peer,
            "{} {} - {} ({:?})",
            request.method(),
            request.uri(),
            response.status().as_u16(),
            elapsed
        );
    }

    fn connection_failed(&self, peer: SocketAddr, error: &ConnectionError) {
        warn!(peer = %peer, kind = error.kind(), error = %error, "connection closed without response");
    }
}
