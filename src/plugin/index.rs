use crate::http::Request;

use super::{Plugin, PluginError};

/// Rewrites directory URIs (path ending in `/`) to point at an index file.
///
/// `/docs/` becomes `/docs/index.html`; a query string stays after the
/// rewritten path. Any other URI is passed through untouched.
#[derive(Debug, Clone)]
pub struct IndexFile {
    file_name: String,
}

impl IndexFile {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl Plugin for IndexFile {
    fn name(&self) -> &str {
        "index"
    }

    fn transform(&self, request: Request) -> Result<Request, PluginError> {
        let path = request.path();
        if !path.ends_with('/') {
            return Ok(request);
        }

        let query = &request.uri()[path.len()..];
        let uri = format!("{path}{}{query}", self.file_name);
        Ok(request.with_uri(uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Headers;

    fn rewrite(uri: &str) -> String {
        let req = Request::new("GET", uri, Headers::new());
        IndexFile::new("index.html")
            .transform(req)
            .unwrap()
            .uri()
            .to_owned()
    }

    #[test]
    fn root_gets_index() {
        assert_eq!(rewrite("/"), "/index.html");
    }

    #[test]
    fn nested_directory_gets_index() {
        assert_eq!(rewrite("/docs/"), "/docs/index.html");
    }

    #[test]
    fn query_string_is_kept() {
        assert_eq!(rewrite("/docs/?a=1"), "/docs/index.html?a=1");
    }

    #[test]
    fn files_are_untouched() {
        assert_eq!(rewrite("/style.css"), "/style.css");
        assert_eq!(rewrite("/search?next=/"), "/search?next=/");
    }

    #[test]
    fn headers_survive_rewrite() {
        let headers: Headers = [("Host", "localhost")].into_iter().collect();
        let out = IndexFile::new("home.htm")
            .transform(Request::new("GET", "/", headers.clone()))
            .unwrap();
        assert_eq!(out.uri(), "/home.htm");
        assert_eq!(out.headers(), &headers);
    }
}
