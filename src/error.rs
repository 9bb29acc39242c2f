//! Per-connection failure taxonomy.

use std::time::Duration;

use thiserror::Error;

use crate::dispatch::DispatchError;
use crate::http::RequestError;
use crate::plugin::PluginError;

/// Why a connection was closed without a response.
///
/// Every variant is terminal for its connection only; the server keeps
/// accepting. "Not found" is not an error here: the static file handler
/// turns it into a `404` response.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection closed before a complete request was read")]
    ConnectionClosed,

    #[error("malformed request: {0}")]
    MalformedRequest(#[source] RequestError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("handler failed: {0}")]
    Handler(#[source] std::io::Error),

    #[error("no complete request within {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConnectionError {
    /// Short, stable name of the failure class, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionClosed => "connection closed",
            Self::MalformedRequest(_) => "malformed request",
            Self::Plugin(_) => "plugin failure",
            Self::UnsupportedMethod(_) => "unsupported method",
            Self::Handler(_) => "handler failure",
            Self::Timeout(_) => "timeout",
            Self::Io(_) => "i/o",
        }
    }
}

impl From<RequestError> for ConnectionError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::ConnectionClosed => Self::ConnectionClosed,
            RequestError::Io(e) => Self::Io(e),
            other => Self::MalformedRequest(other),
        }
    }
}

impl From<DispatchError> for ConnectionError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::UnsupportedMethod(method) => Self::UnsupportedMethod(method),
            DispatchError::Handler(e) => Self::Handler(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_are_classified() {
        assert!(matches!(
            ConnectionError::from(RequestError::ConnectionClosed),
            ConnectionError::ConnectionClosed
        ));
        let malformed = ConnectionError::from(RequestError::InvalidHeader { line: "x\r\n".into() });
        assert_eq!(malformed.kind(), "malformed request");
    }

    #[test]
    fn dispatch_errors_are_classified() {
        let err = ConnectionError::from(DispatchError::UnsupportedMethod("DELETE".into()));
        assert_eq!(err.kind(), "unsupported method");
        assert_eq!(err.to_string(), "unsupported method: DELETE");
    }
}
