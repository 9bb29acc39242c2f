//! HTTP/1.x request head parsing.
//!
//! [`Request::parse`] works on the line sequence produced by
//! [`read_request_lines`](super::read_request_lines): the request line, zero or
//! more `Name: Value` lines and the bare `"\r\n"` terminator.

use std::fmt;

use thiserror::Error;

use super::{Headers, Method};

/// The line that ends a request head.
pub const TERMINATOR: &str = "\r\n";

/// Errors that can occur while reading or parsing a request head.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("connection closed before the request head was complete")]
    ConnectionClosed,

    #[error("request head is empty")]
    Empty,

    #[error("request head is missing its terminating blank line")]
    MissingTerminator,

    #[error("invalid request line: {line:?}")]
    InvalidRequestLine { line: String },

    #[error("invalid header line: {line:?}")]
    InvalidHeader { line: String },

    #[error("request line is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("request line exceeds maximum length of {max_bytes} bytes")]
    LineTooLong { max_bytes: usize },

    #[error("request head exceeds maximum size of {max_bytes} bytes")]
    HeadTooLarge { max_bytes: usize },

    #[error("request head exceeds maximum of {max_lines} lines")]
    TooManyLines { max_lines: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RequestError {
    /// Returns `true` when the peer went away before the head was complete,
    /// as opposed to sending something that is not a valid request.
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, Self::ConnectionClosed)
    }
}

/// A parsed HTTP request head.
///
/// A `Request` is never mutated in place: the `with_*` methods consume it and
/// return a new value, which is how plugins hand a transformed request down
/// the chain.
///
/// # Examples
///
/// ```
/// use httpserve::http::{Method, Request};
///
/// let lines = ["GET /hello HTTP/1.1\r\n", "Host: localhost\r\n", "\r\n"];
/// let request = Request::parse(&lines).unwrap();
///
/// assert_eq!(request.method(), &Method::Get);
/// assert_eq!(request.uri(), "/hello");
/// assert_eq!(request.headers().get("Host"), Some("localhost"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    uri: String,
    headers: Headers,
}

impl Request {
    /// Builds a request from its parts.
    pub fn new(method: impl Into<Method>, uri: impl Into<String>, headers: Headers) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            headers,
        }
    }

    /// Parses a request head from its raw lines, terminators included.
    ///
    /// The first line is split on whitespace: the first token is the method,
    /// the second the URI, anything after is ignored. Every line between the
    /// request line and the final `"\r\n"` is a header. The header name is
    /// everything before the first `':'`; the value is everything after the
    /// `": "` separator up to the line terminator, byte for byte. When the
    /// colon is not followed by a space, the value starts right after the
    /// colon: `"X-Flag:on\r\n"` yields `"on"`, no character is dropped.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Empty`]: `lines` is empty.
    /// - [`RequestError::MissingTerminator`]: the last line is not `"\r\n"`.
    /// - [`RequestError::InvalidRequestLine`]: fewer than two tokens.
    /// - [`RequestError::InvalidHeader`]: a header line has no colon.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self, RequestError> {
        let (request_line, rest) = lines.split_first().ok_or(RequestError::Empty)?;
        let request_line = request_line.as_ref();

        let header_lines = match rest.split_last() {
            Some((last, header_lines)) if last.as_ref() == TERMINATOR => header_lines,
            _ => return Err(RequestError::MissingTerminator),
        };

        let mut tokens = request_line.split_ascii_whitespace();
        let (method, uri) = match (tokens.next(), tokens.next()) {
            (Some(method), Some(uri)) => (method, uri),
            _ => {
                return Err(RequestError::InvalidRequestLine {
                    line: request_line.to_owned(),
                });
            }
        };

        let mut headers = Headers::with_capacity(header_lines.len());
        for line in header_lines {
            let (name, value) = parse_header_line(line.as_ref())?;
            headers.insert(name, value);
        }

        Ok(Self::new(method, uri, headers))
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request target exactly as it was sent.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the request target without its query string.
    pub fn path(&self) -> &str {
        match self.uri.find('?') {
            Some(pos) => &self.uri[..pos],
            None => &self.uri,
        }
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns a copy of this request pointing at a different target.
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Returns a copy of this request with `name` set to `value`.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns a copy of this request without the header `name`.
    #[must_use]
    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    /// Splits the request into its method, URI and headers.
    pub fn into_parts(self) -> (Method, String, Headers) {
        (self.method, self.uri, self.headers)
    }
}

/// Renders the request as an `HTTP/1.0` head that [`Request::parse`] accepts.
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} HTTP/1.0\r\n{}{TERMINATOR}", self.method, self.uri, self.headers)
    }
}

fn parse_header_line(line: &str) -> Result<(&str, &str), RequestError> {
    let colon = line.find(':').ok_or_else(|| RequestError::InvalidHeader {
        line: line.to_owned(),
    })?;

    let name = &line[..colon];
    let rest = &line[colon + 1..];
    let rest = rest
        .strip_suffix("\r\n")
        .or_else(|| rest.strip_suffix('\n'))
        .unwrap_or(rest);
    let value = rest.strip_prefix(' ').unwrap_or(rest);

    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn parse_simple_get() {
        let req = Request::parse(lines(&[
            "GET / HTTP/1.1\r\n",
            "Host: localhost\r\n",
            "\r\n",
        ]).as_slice())
        .unwrap();
        assert_eq!(req.method(), &Method::Get);
        assert_eq!(req.uri(), "/");
        assert_eq!(req.headers().get("Host"), Some("localhost"));
        assert_eq!(req.headers().len(), 1);
    }

    #[test]
    fn parse_without_headers() {
        let req = Request::parse(&["GET /a.txt HTTP/1.0\r\n", "\r\n"]).unwrap();
        assert_eq!(req.uri(), "/a.txt");
        assert!(req.headers().is_empty());
    }

    #[test]
    fn duplicate_header_last_write_wins() {
        let req = Request::parse(&[
            "GET / HTTP/1.1\r\n",
            "X-Test: v1\r\n",
            "X-Test: v2\r\n",
            "\r\n",
        ])
        .unwrap();
        assert_eq!(req.headers().get("X-Test"), Some("v2"));
        assert_eq!(req.headers().len(), 1);
    }

    #[test]
    fn header_value_taken_verbatim() {
        let req = Request::parse(&[
            "GET / HTTP/1.1\r\n",
            "X-Spaced:   padded  \r\n",
            "X-Url: http://example.com:8080/\r\n",
            "X-Tight:tight\r\n",
            "X-Empty: \r\n",
            "\r\n",
        ])
        .unwrap();
        assert_eq!(req.headers().get("X-Spaced"), Some("  padded  "));
        assert_eq!(req.headers().get("X-Url"), Some("http://example.com:8080/"));
        assert_eq!(req.headers().get("X-Tight"), Some("tight"));
        assert_eq!(req.headers().get("X-Empty"), Some(""));
    }

    #[test]
    fn uri_is_not_decoded() {
        let req = Request::parse(&["GET /a%20b?x=1+2 HTTP/1.1\r\n", "\r\n"]).unwrap();
        assert_eq!(req.uri(), "/a%20b?x=1+2");
        assert_eq!(req.path(), "/a%20b");
    }

    #[test]
    fn request_line_with_one_token_is_malformed() {
        let err = Request::parse(&["GET\r\n", "\r\n"]).unwrap_err();
        assert!(matches!(err, RequestError::InvalidRequestLine { .. }));
    }

    #[test]
    fn blank_request_line_is_malformed() {
        let err = Request::parse(&["\r\n", "\r\n"]).unwrap_err();
        assert!(matches!(err, RequestError::InvalidRequestLine { .. }));
    }

    #[test]
    fn header_without_colon_is_malformed() {
        let err = Request::parse(&["GET / HTTP/1.1\r\n", "NoColonHere\r\n", "\r\n"]).unwrap_err();
        assert!(matches!(err, RequestError::InvalidHeader { line } if line == "NoColonHere\r\n"));
    }

    #[test]
    fn header_value_without_space_keeps_every_byte() {
        let req = Request::parse(&["GET / HTTP/1.1\r\n", "X-Flag:on\r\n", "\r\n"]).unwrap();
        assert_eq!(req.headers().get("X-Flag"), Some("on"));
    }

    #[test]
    fn missing_terminator_is_rejected() {
        let err = Request::parse(&["GET / HTTP/1.1\r\n", "Host: x\r\n"]).unwrap_err();
        assert!(matches!(err, RequestError::MissingTerminator));

        let err = Request::parse::<&str>(&[]).unwrap_err();
        assert!(matches!(err, RequestError::Empty));
    }

    #[test]
    fn rendered_head_parses_back() {
        let headers: Headers = [
            ("Host", "localhost:8000"),
            ("User-Agent", "curl/8.0"),
            ("Accept", "*/*"),
        ]
        .into_iter()
        .collect();
        let original = Request::new("GET", "/docs/index.html", headers);

        let rendered = original.to_string();
        let raw: Vec<String> = rendered.split_inclusive("\r\n").map(str::to_owned).collect();
        let parsed = Request::parse(raw.as_slice()).unwrap();

        assert_eq!(parsed, original);
    }

    #[test]
    fn with_methods_build_new_values() {
        let req = Request::parse(&["GET / HTTP/1.1\r\n", "A: 1\r\n", "\r\n"]).unwrap();
        let changed = req.clone().with_uri("/index.html").with_header("B", "2").without_header("A");
        assert_eq!(req.uri(), "/");
        assert_eq!(req.headers().get("A"), Some("1"));
        assert_eq!(changed.uri(), "/index.html");
        assert_eq!(changed.headers().get("A"), None);
        assert_eq!(changed.headers().get("B"), Some("2"));
    }
}
