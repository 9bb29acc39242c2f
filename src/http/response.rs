//! HTTP/1.0 response serialization.
//!
//! The wire format is deliberately bare: a status line, an empty line and the
//! content. No headers are written, not even `Content-Length`; the end of the
//! content is signalled by closing the connection.

use bytes::{BufMut, Bytes, BytesMut};

use super::StatusCode;

/// An HTTP response, ready to be serialized and sent.
///
/// # Examples
///
/// ```
/// use httpserve::http::{Response, StatusCode};
///
/// let bytes = Response::new(StatusCode::OK).content("hi").into_bytes();
/// assert_eq!(&bytes[..], b"HTTP/1.0 200 OK\r\n\r\nhi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    content: Bytes,
}

impl Response {
    /// Creates a new response with the given status and empty content.
    pub fn new(status: impl Into<StatusCode>) -> Self {
        Self {
            status: status.into(),
            content: Bytes::new(),
        }
    }

    /// `200 OK` carrying `content`.
    pub fn ok(content: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK).content(content)
    }

    /// `404 Not Found` with empty content.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }

    /// Sets the response content.
    #[must_use]
    pub fn content(mut self, content: impl Into<Bytes>) -> Self {
        self.content = content.into();
        self
    }

    /// Returns the status code of this response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response content.
    pub fn body(&self) -> &Bytes {
        &self.content
    }

    /// Serializes the response as `HTTP/1.0 <code> <reason>\r\n\r\n<content>`.
    pub fn into_bytes(self) -> BytesMut {
        let status_line = format!(
            "HTTP/1.0 {} {}\r\n\r\n",
            self.status.as_u16(),
            self.status.reason_phrase()
        );

        let mut buf = BytesMut::with_capacity(status_line.len() + self.content.len());
        buf.put(status_line.as_bytes());
        buf.put(self.content);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_string(bytes: BytesMut) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn ok_response() {
        let r = Response::new(200u16).content("hi");
        assert_eq!(to_string(r.into_bytes()), "HTTP/1.0 200 OK\r\n\r\nhi");
    }

    #[test]
    fn not_found_response() {
        let r = Response::not_found();
        assert_eq!(to_string(r.into_bytes()), "HTTP/1.0 404 Not Found\r\n\r\n");
    }

    #[test]
    fn unknown_code() {
        let r = Response::new(999u16).content("x");
        assert_eq!(to_string(r.into_bytes()), "HTTP/1.0 999 Unknown\r\n\r\nx");
    }

    #[test]
    fn binary_content_is_untouched() {
        let payload = vec![0u8, 159, 146, 150, b'\r', b'\n'];
        let r = Response::ok(payload.clone());
        let bytes = r.into_bytes();
        assert_eq!(&bytes[..19], b"HTTP/1.0 200 OK\r\n\r\n");
        assert_eq!(&bytes[19..], &payload[..]);
    }
}
