//! Async TCP server using Tokio.
//!
//! Accepts TCP connections and hands each one to a [`ConnectionHandler`] on
//! its own Tokio task. Connections are independent: a failure on one never
//! affects another or the accept loop.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error};

mod connection;

pub use connection::{ConnectionHandler, ConnectionState};

/// Errors produced by the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// The httpserve TCP server.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use httpserve::dispatch::Dispatcher;
/// use httpserve::plugin::{IndexFile, PluginChain};
/// use httpserve::server::{ConnectionHandler, Server};
/// use httpserve::store::FsStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let plugins = PluginChain::new().with(IndexFile::new("index.html"));
///     let dispatcher = Dispatcher::with_static_files(FsStore::new("public"));
///     let handler = ConnectionHandler::new(Arc::new(plugins), Arc::new(dispatcher));
///
///     let server = Server::bind("localhost:8000").await?;
///     server.run(handler).await?;
///     Ok(())
/// }
/// ```
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Server {
    /// Binds the server to the given TCP address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound
    /// (e.g. port already in use, insufficient permissions).
    pub async fn bind(addr: impl AsRef<str>) -> Result<Self, ServerError> {
        let addr = addr.as_ref();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.to_owned(),
                source: e,
            })?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections forever, serving each on its own task.
    ///
    /// Accept errors are logged and skipped; this only returns if the
    /// surrounding task is cancelled.
    pub async fn run(self, handler: ConnectionHandler) -> Result<(), ServerError> {
        handler.reporter().greeting(self.local_addr);

        loop {
            let (stream, peer_addr) = match self.listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            handler.reporter().new_connection(peer_addr);
            let handler = handler.clone();

            tokio::spawn(async move {
                // Failures were already reported through the handler's output.
                if let Err(e) = handler.serve(stream, peer_addr).await {
                    debug!(peer = %peer_addr, kind = e.kind(), "connection task finished with error");
                }
            });
        }
    }
}
