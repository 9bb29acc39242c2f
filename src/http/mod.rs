//! HTTP/1.x protocol types, line reading and parsing.
//!
//! This module provides the core HTTP primitives:
//! [`Method`], [`StatusCode`], [`Headers`], [`Request`], and [`Response`],
//! plus [`read_request_lines`] which frames a request head off the wire.

use std::fmt;

pub mod headers;
pub mod reader;
pub mod request;
pub mod response;

pub use headers::Headers;
pub use reader::{ReadLimits, read_request_lines};
pub use request::{Request, RequestError};
pub use response::Response;

/// An HTTP response status code.
///
/// Any `u16` is accepted. Only the codes the server actually produces carry a
/// reason phrase; every other code is rendered as `Unknown` on the wire.
///
/// # Examples
///
/// ```
/// use httpserve::http::StatusCode;
///
/// assert_eq!(StatusCode::OK.as_u16(), 200);
/// assert_eq!(StatusCode::OK.canonical_reason(), Some("OK"));
/// assert_eq!(StatusCode::from(999u16).reason_phrase(), "Unknown");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    /// `200 OK`
    pub const OK: StatusCode = StatusCode(200);
    /// `404 Not Found`
    pub const NOT_FOUND: StatusCode = StatusCode(404);

    /// Returns the numeric status code as a `u16`.
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns the reason phrase from the fixed table, or `None` for codes
    /// outside of it.
    pub fn canonical_reason(self) -> Option<&'static str> {
        match self.0 {
            200 => Some("OK"),
            404 => Some("Not Found"),
            _ => None,
        }
    }

    /// Returns the reason phrase written on the status line.
    pub fn reason_phrase(self) -> &'static str {
        self.canonical_reason().unwrap_or("Unknown")
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> u16 {
        code.as_u16()
    }
}

/// An HTTP request method.
///
/// Standard methods are represented as unit variants for zero-cost comparison.
/// Any other token is captured verbatim in the `Custom` variant, so
/// `method.as_str()` always returns exactly what the client sent.
///
/// # Examples
///
/// ```
/// use httpserve::http::Method;
///
/// let method: Method = "GET".parse().unwrap();
/// assert_eq!(method, Method::Get);
/// assert_eq!(method.as_str(), "GET");
///
/// let odd: Method = "get".parse().unwrap();
/// assert_eq!(odd, Method::Custom("get".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
    Connect,
    Trace,
    /// A non-standard token, kept exactly as received.
    Custom(String),
}

impl Method {
    /// Returns the method token as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Connect => "CONNECT",
            Self::Trace => "TRACE",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for Method {
    fn from(s: &str) -> Self {
        match s {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            "PATCH" => Self::Patch,
            "CONNECT" => Self::Connect,
            "TRACE" => Self::Trace,
            other => Self::Custom(other.to_owned()),
        }
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
