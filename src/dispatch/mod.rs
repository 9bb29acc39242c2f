//! Method dispatch: map a request's method token to the handler serving it.
//!
//! The [`Dispatcher`] is a plain table from [`Method`] to [`MethodHandler`].
//! New methods are supported by registering another entry; a request whose
//! method has no entry fails with [`DispatchError::UnsupportedMethod`].

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::http::{Method, Request, Response};
use crate::store::ContentStore;

mod static_files;

pub use static_files::StaticFileHandler;

/// Boxed future returned by [`MethodHandler::handle`].
pub type HandlerFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Response, DispatchError>> + Send + 'a>>;

/// Errors that abort dispatch. None of them produce a response.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0} is not yet supported")]
    UnsupportedMethod(String),

    #[error("handler failed: {0}")]
    Handler(#[from] std::io::Error),
}

/// Handles every request carrying one particular method.
///
/// Handler-level outcomes (such as "file not found") are expressed as a
/// [`Response`]; an `Err` aborts the connection without one.
pub trait MethodHandler: Send + Sync {
    fn handle(&self, request: Request) -> HandlerFuture<'_>;
}

/// Routes requests to the handler registered for their method.
///
/// # Examples
///
/// ```
/// use httpserve::dispatch::{DispatchError, Dispatcher};
/// use httpserve::http::{Headers, Request, StatusCode};
/// use httpserve::store::MemoryStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let dispatcher = Dispatcher::with_static_files(MemoryStore::new().with("/a.txt", "A"));
///
/// let ok = dispatcher.dispatch(Request::new("GET", "/a.txt", Headers::new())).await.unwrap();
/// assert_eq!(ok.status(), StatusCode::OK);
///
/// let err = dispatcher.dispatch(Request::new("DELETE", "/a.txt", Headers::new())).await;
/// assert!(matches!(err, Err(DispatchError::UnsupportedMethod(m)) if m == "DELETE"));
/// # }
/// ```
#[derive(Clone, Default)]
pub struct Dispatcher {
    handlers: HashMap<Method, Arc<dyn MethodHandler>>,
}

impl Dispatcher {
    /// Creates a dispatcher with no registered methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the default table: `GET` served by a [`StaticFileHandler`]
    /// reading from `store`.
    pub fn with_static_files<S>(store: S) -> Self
    where
        S: ContentStore + 'static,
    {
        let mut dispatcher = Self::new();
        dispatcher.register(Method::Get, StaticFileHandler::new(Arc::new(store)));
        dispatcher
    }

    /// Registers `handler` for `method`, replacing any previous entry.
    pub fn register<H>(&mut self, method: Method, handler: H)
    where
        H: MethodHandler + 'static,
    {
        self.handlers.insert(method, Arc::new(handler));
    }

    /// Returns `true` if a handler is registered for `method`.
    pub fn supports(&self, method: &Method) -> bool {
        self.handlers.contains_key(method)
    }

    /// Hands `request` to the handler registered for its method.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnsupportedMethod`]: no handler for the method; carries
    ///   the method token as sent.
    /// - [`DispatchError::Handler`]: the handler itself failed.
    pub async fn dispatch(&self, request: Request) -> Result<Response, DispatchError> {
        let handler = self
            .handlers
            .get(request.method())
            .ok_or_else(|| DispatchError::UnsupportedMethod(request.method().to_string()))?;
        handler.handle(request).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(self.handlers.keys().map(Method::as_str))
            .finish()
    }
}
