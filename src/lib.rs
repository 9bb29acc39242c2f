//! # httpserve
//!
//! A minimal HTTP/1.x static file server.
//!
//! Every connection carries exactly one request. The request head is read as
//! CRLF-terminated lines, parsed into a [`Request`], passed through an ordered
//! [`PluginChain`], dispatched on its method and answered with a bare
//! `HTTP/1.0` response before the connection is closed.
//!
//! ```text
//! bytes -> read_request_lines -> Request::parse -> PluginChain::apply
//!       -> Dispatcher::dispatch -> Response::into_bytes -> bytes
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use httpserve::{ConnectionHandler, Dispatcher, PluginChain, Server};
//! use httpserve::store::FsStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handler = ConnectionHandler::new(
//!         Arc::new(PluginChain::new()),
//!         Arc::new(Dispatcher::with_static_files(FsStore::new("public"))),
//!     );
//!     Server::bind("127.0.0.1:8000").await?.run(handler).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod output;
pub mod plugin;
pub mod server;
pub mod store;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use config::{ConfigError, ServerConfig};
pub use dispatch::{DispatchError, Dispatcher, MethodHandler, StaticFileHandler};
pub use error::ConnectionError;
pub use http::{Headers, Method, Request, RequestError, Response, StatusCode};
pub use output::{Output, TracingOutput};
pub use plugin::{Plugin, PluginChain, PluginError};
pub use server::{ConnectionHandler, Server, ServerError};
