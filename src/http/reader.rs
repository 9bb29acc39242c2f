//! Line-oriented framing of a request head.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use super::request::{RequestError, TERMINATOR};

/// Bounds applied while reading a request head off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    /// Maximum length of a single line, terminator included.
    pub max_line_len: usize,
    /// Maximum size of the whole head, terminator included.
    pub max_head_bytes: usize,
    /// Maximum number of lines, terminator included.
    pub max_lines: usize,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_line_len: 8 * 1024,
            max_head_bytes: 64 * 1024,
            max_lines: 100,
        }
    }
}

/// Reads lines from `reader` until a line consisting solely of `"\r\n"`.
///
/// Every returned line keeps its terminator; the bare `"\r\n"` is the last
/// element. A line ending in a lone `"\n"` is still a line, but only the exact
/// `"\r\n"` line ends the head.
///
/// # Errors
///
/// - [`RequestError::ConnectionClosed`]: the stream ended before the terminator,
///   even if a partial line or several complete lines had already arrived.
/// - [`RequestError::LineTooLong`], [`RequestError::HeadTooLarge`],
///   [`RequestError::TooManyLines`]: a limit in `limits` was exceeded.
/// - [`RequestError::InvalidUtf8`]: a line is not valid UTF-8.
/// - [`RequestError::Io`]: the underlying read failed.
pub async fn read_request_lines<R>(
    reader: &mut R,
    limits: ReadLimits,
) -> Result<Vec<String>, RequestError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = Vec::new();
    let mut head_bytes = 0usize;
    let mut buf = Vec::new();

    loop {
        if lines.len() == limits.max_lines {
            return Err(RequestError::TooManyLines {
                max_lines: limits.max_lines,
            });
        }

        buf.clear();
        // One byte over the limit tells "exactly at the limit" apart from "too long".
        let cap = limits.max_line_len as u64 + 1;
        let n = (&mut *reader).take(cap).read_until(b'\n', &mut buf).await?;

        if n == 0 {
            return Err(RequestError::ConnectionClosed);
        }
        if n > limits.max_line_len {
            return Err(RequestError::LineTooLong {
                max_bytes: limits.max_line_len,
            });
        }
        if !buf.ends_with(b"\n") {
            return Err(RequestError::ConnectionClosed);
        }

        head_bytes += n;
        if head_bytes > limits.max_head_bytes {
            return Err(RequestError::HeadTooLarge {
                max_bytes: limits.max_head_bytes,
            });
        }

        let line = String::from_utf8(std::mem::take(&mut buf))?;
        let done = line == TERMINATOR;
        lines.push(line);

        if done {
            return Ok(lines);
        }
    }
}
