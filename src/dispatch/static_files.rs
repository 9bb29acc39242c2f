use std::sync::Arc;

use tracing::debug;

use super::{HandlerFuture, MethodHandler};
use crate::http::{Request, Response};
use crate::store::ContentStore;

/// `GET` handler serving content from a [`ContentStore`].
///
/// Found content is a `200` carrying the stored bytes; anything the store
/// does not have is a `404` with empty content. The query string, if any, is
/// not part of the lookup path.
#[derive(Clone)]
pub struct StaticFileHandler {
    store: Arc<dyn ContentStore>,
}

impl StaticFileHandler {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }
}

impl MethodHandler for StaticFileHandler {
    fn handle(&self, request: Request) -> HandlerFuture<'_> {
        Box::pin(async move {
            let path = request.path();
            match self.store.fetch(path).await? {
                Some(content) => Ok(Response::ok(content)),
                None => {
                    debug!(path, "content not found");
                    Ok(Response::not_found())
                }
            }
        })
    }
}
