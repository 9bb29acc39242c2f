//! Content stores: where the static file handler gets its bytes from.
//!
//! A [`ContentStore`] answers one question: what are the bytes behind this
//! request path? `Ok(None)` means "not found" and becomes a `404`; an `Err`
//! is an I/O failure that aborts the connection.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;

use bytes::Bytes;
use tracing::debug;

/// Boxed future returned by [`ContentStore::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = io::Result<Option<Bytes>>> + Send + 'a>>;

/// Source of static content addressed by request path.
pub trait ContentStore: Send + Sync {
    /// Fetches the content stored under `path` (the request path, leading `/`
    /// included).
    fn fetch<'a>(&'a self, path: &'a str) -> FetchFuture<'a>;
}

/// Serves files from a directory on disk.
///
/// The request path is appended to the root. Paths that could leave the root
/// (`..` components, NUL bytes) and paths naming a directory are reported as
/// not found.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a request path onto a file below the root, or `None` if the path
    /// is not allowed.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        if path.contains('\0') {
            return None;
        }

        let mut resolved = self.root.clone();
        for component in Path::new(path.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }

    async fn read(&self, path: &str) -> io::Result<Option<Bytes>> {
        let Some(file) = self.resolve(path) else {
            debug!(path, "rejected path outside of served root");
            return Ok(None);
        };

        let metadata = match tokio::fs::metadata(&file).await {
            Ok(metadata) => metadata,
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => return Err(e),
        };
        if !metadata.is_file() {
            return Ok(None);
        }

        match tokio::fs::read(&file).await {
            Ok(contents) => Ok(Some(Bytes::from(contents))),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// A path that walks through a regular file (`/a.txt/x`) fails with NotADirectory.
fn is_not_found(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

impl ContentStore for FsStore {
    fn fetch<'a>(&'a self, path: &'a str) -> FetchFuture<'a> {
        Box::pin(self.read(path))
    }
}

/// In-memory store, keyed by exact request path.
///
/// # Examples
///
/// ```
/// use httpserve::store::{ContentStore, MemoryStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = MemoryStore::new().with("/hello.txt", "hello");
/// assert_eq!(store.fetch("/hello.txt").await.unwrap().unwrap(), "hello");
/// assert!(store.fetch("/missing").await.unwrap().is_none());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: HashMap<String, Bytes>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, path: impl Into<String>, contents: impl Into<Bytes>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Bytes>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl ContentStore for MemoryStore {
    fn fetch<'a>(&'a self, path: &'a str) -> FetchFuture<'a> {
        let found = self.files.get(path).cloned();
        Box::pin(async move { Ok(found) })
    }
}
