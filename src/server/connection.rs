//! Per-connection request handling.
//!
//! Each accepted connection walks a linear state machine:
//!
//! ```text
//! Accepted -> Reading -> Parsing -> Transforming -> Dispatching -> Responding -> Closed
//!                 \          \            \               \
//!                  +----------+------------+---------------+--> Failed
//! ```
//!
//! A failure in any of the middle stages ends the connection without writing a
//! single byte. The stream is shut down exactly once on every path.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::dispatch::Dispatcher;
use crate::error::ConnectionError;
use crate::http::{ReadLimits, Request, Response, read_request_lines};
use crate::output::{Output, TracingOutput};
use crate::plugin::PluginChain;

/// Stages a connection goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Accepted,
    Reading,
    Parsing,
    Transforming,
    Dispatching,
    Responding,
    Closed,
    Failed,
}

/// Serves one request per connection: read, parse, transform, dispatch, respond, close.
///
/// Cloning is cheap; the plugin chain, dispatcher and output are shared
/// read-only between all clones.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use httpserve::dispatch::Dispatcher;
/// use httpserve::plugin::PluginChain;
/// use httpserve::server::ConnectionHandler;
/// use httpserve::store::MemoryStore;
/// use tokio::io::{AsyncReadExt, AsyncWriteExt};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let handler = ConnectionHandler::new(
///     Arc::new(PluginChain::new()),
///     Arc::new(Dispatcher::with_static_files(MemoryStore::new().with("/hi", "hi"))),
/// );
///
/// let (mut client, server) = tokio::io::duplex(1024);
/// client.write_all(b"GET /hi HTTP/1.0\r\n\r\n").await.unwrap();
/// handler.serve(server, "127.0.0.1:9".parse().unwrap()).await.unwrap();
///
/// let mut reply = String::new();
/// client.read_to_string(&mut reply).await.unwrap();
/// assert_eq!(reply, "HTTP/1.0 200 OK\r\n\r\nhi");
/// # }
/// ```
#[derive(Clone)]
pub struct ConnectionHandler {
    plugins: Arc<PluginChain>,
    dispatcher: Arc<Dispatcher>,
    output: Arc<dyn Output>,
    limits: ReadLimits,
    read_timeout: Option<Duration>,
}

impl ConnectionHandler {
    /// Creates a handler reporting to [`TracingOutput`], with default read
    /// limits and no read timeout.
    pub fn new(plugins: Arc<PluginChain>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            plugins,
            dispatcher,
            output: Arc::new(TracingOutput),
            limits: ReadLimits::default(),
            read_timeout: None,
        }
    }

    #[must_use]
    pub fn output(mut self, output: Arc<dyn Output>) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub fn read_limits(mut self, limits: ReadLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Bounds the time a client has to deliver its complete request head.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub(crate) fn reporter(&self) -> &dyn Output {
        self.output.as_ref()
    }

    /// Serves a single request on `stream`, then closes it.
    ///
    /// On success exactly one response has been written. On failure nothing
    /// has been written; the error is reported to the [`Output`] and returned.
    ///
    /// # Errors
    ///
    /// Any [`ConnectionError`] raised while reading, parsing, transforming,
    /// dispatching or writing.
    pub async fn serve<S>(&self, stream: S, peer: SocketAddr) -> Result<(), ConnectionError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let started = Instant::now();
        let mut stream = BufReader::new(stream);
        enter(peer, ConnectionState::Accepted);

        let outcome = self.process(&mut stream, peer).await;

        if let Err(e) = stream.shutdown().await {
            debug!(peer = %peer, error = %e, "shutdown failed");
        }
        drop(stream);

        match outcome {
            Ok((request, response)) => {
                enter(peer, ConnectionState::Closed);
                self.output
                    .log_request(peer, &request, &response, started.elapsed());
                Ok(())
            }
            Err(e) => {
                enter(peer, ConnectionState::Failed);
                self.output.connection_failed(peer, &e);
                Err(e)
            }
        }
    }

    async fn process<S>(
        &self,
        stream: &mut BufReader<S>,
        peer: SocketAddr,
    ) -> Result<(Request, Response), ConnectionError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        enter(peer, ConnectionState::Reading);
        let read = read_request_lines(stream, self.limits);
        let lines = match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| ConnectionError::Timeout(limit))??,
            None => read.await?,
        };

        enter(peer, ConnectionState::Parsing);
        let request = Request::parse(lines.as_slice())?;

        enter(peer, ConnectionState::Transforming);
        let request = self.plugins.apply(request)?;

        enter(peer, ConnectionState::Dispatching);
        debug!(
            peer = %peer,
            method = %request.method(),
            uri = request.uri(),
            "dispatching request"
        );
        let response = self.dispatcher.dispatch(request.clone()).await?;

        enter(peer, ConnectionState::Responding);
        stream.write_all(&response.clone().into_bytes()).await?;
        stream.flush().await?;

        Ok((request, response))
    }
}

fn enter(peer: SocketAddr, state: ConnectionState) {
    trace!(peer = %peer, state = ?state, "connection state");
}
