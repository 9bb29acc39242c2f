//! Plugin pipeline: ordered request transformations applied before dispatch.
//!
//! ## Core types
//!
//! - [`Plugin`]: trait implemented by every transformation stage.
//! - [`PluginChain`]: ordered, shareable list of plugins; [`PluginChain::apply`]
//!   folds a request through it.
//! - [`PluginError`]: failure raised by a stage, tagged with the stage's name.
//! - [`Identity`] and [`IndexFile`]: built-in plugins.
//!
//! A chain is assembled once at startup and then shared read-only between all
//! connection tasks behind an [`Arc`].

use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use crate::http::Request;

mod index;

pub use index::IndexFile;

/// Boxed error type plugins may wrap.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A plugin failed to transform a request.
#[derive(Debug, Error)]
#[error("plugin `{plugin}` failed: {source}")]
pub struct PluginError {
    plugin: String,
    #[source]
    source: BoxError,
}

impl PluginError {
    /// Creates an error attributed to the plugin named `plugin`.
    pub fn new(plugin: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            plugin: plugin.into(),
            source: source.into(),
        }
    }

    /// Name of the plugin that failed.
    pub fn plugin(&self) -> &str {
        &self.plugin
    }
}

/// A request transformation stage.
///
/// `transform` receives a request by value and returns the request the next
/// stage will see. It runs synchronously, exactly once per request, and must
/// not keep anything from the request beyond the call.
///
/// Closures become plugins through [`from_fn`].
pub trait Plugin: Send + Sync {
    /// Name used in logs and in [`PluginError`].
    fn name(&self) -> &str;

    fn transform(&self, request: Request) -> Result<Request, PluginError>;
}

/// Wraps a closure as a named [`Plugin`].
///
/// # Examples
///
/// ```
/// use httpserve::plugin::{PluginChain, from_fn};
/// use httpserve::http::{Headers, Request};
///
/// let chain = PluginChain::new()
///     .with(from_fn("served-by", |req| Ok(req.with_header("X-Served-By", "httpserve"))));
///
/// let out = chain.apply(Request::new("GET", "/", Headers::new())).unwrap();
/// assert_eq!(out.headers().get("X-Served-By"), Some("httpserve"));
/// ```
pub fn from_fn<F>(name: impl Into<String>, f: F) -> FnPlugin<F>
where
    F: Fn(Request) -> Result<Request, PluginError> + Send + Sync,
{
    FnPlugin {
        name: name.into(),
        f,
    }
}

/// A closure-backed plugin, built with [`from_fn`].
pub struct FnPlugin<F> {
    name: String,
    f: F,
}

impl<F> Plugin for FnPlugin<F>
where
    F: Fn(Request) -> Result<Request, PluginError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, request: Request) -> Result<Request, PluginError> {
        (self.f)(request)
    }
}

/// Pass-through plugin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Plugin for Identity {
    fn name(&self) -> &str {
        "identity"
    }

    fn transform(&self, request: Request) -> Result<Request, PluginError> {
        Ok(request)
    }
}

/// An ordered sequence of plugins applied left to right.
///
/// # Examples
///
/// ```
/// use httpserve::plugin::{IndexFile, PluginChain};
/// use httpserve::http::{Headers, Request};
///
/// let chain = PluginChain::new().with(IndexFile::new("index.html"));
/// let out = chain.apply(Request::new("GET", "/", Headers::new())).unwrap();
/// assert_eq!(out.uri(), "/index.html");
/// ```
#[derive(Clone, Default)]
pub struct PluginChain {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginChain {
    /// Creates an empty chain; applying it returns requests unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `plugin` to the end of the chain.
    #[must_use]
    pub fn with<P>(mut self, plugin: P) -> Self
    where
        P: Plugin + 'static,
    {
        self.push(Arc::new(plugin));
        self
    }

    /// Appends an already shared plugin to the end of the chain.
    pub fn push(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Names of the plugins in application order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|p| p.name())
    }

    /// Folds `request` through every plugin in order.
    ///
    /// The output of each plugin is the input of the next. With plugins
    /// `[a, b]` the result is `b(a(request))`.
    ///
    /// # Errors
    ///
    /// Returns the first [`PluginError`] raised; later plugins do not run and
    /// no partially transformed request is returned.
    pub fn apply(&self, request: Request) -> Result<Request, PluginError> {
        self.plugins.iter().try_fold(request, |request, plugin| {
            trace!(plugin = plugin.name(), uri = request.uri(), "applying plugin");
            plugin.transform(request)
        })
    }
}

impl std::fmt::Debug for PluginChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
