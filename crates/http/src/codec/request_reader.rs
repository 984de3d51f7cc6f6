//! HTTP request reader
//!
//! Parses one request off a buffered byte stream: the request line, the header lines up
//! to the first blank line, and a body framed by `Content-Length`.
//!
//! # Framing
//!
//! - Lines end with `\n`; a `\r` right before it is dropped.
//! - Without a `Content-Length` header the request has no body. A body of unknown length
//!   would leave no way to tell where the next request on the connection begins.
//! - Chunked transfer encoding is not supported.
//!
//! The reader never takes more bytes off the stream than the request occupies. The
//! returned body borrows the stream and is limited to the declared length, so once the
//! body is consumed the stream is positioned at the start of the next request.
//!
//! # Limits
//!
//! - Maximum size of the request line plus headers: 8KB

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tracing::trace;

use crate::ensure;
use crate::protocol::headers::CONTENT_LENGTH;
use crate::protocol::{Headers, HttpRequest, ParseError, ReqBody, parse_method};

/// Maximum size in bytes allowed for the request line and header section together
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Reads the next request from `src`.
///
/// Returns `Ok(None)` when the stream ends before the first byte of a request, which is
/// how a peer closes a keep-alive connection between requests.
///
/// # Errors
///
/// - [`ParseError::InvalidRequestLine`] unless the first line has exactly three
///   whitespace separated tokens
/// - [`ParseError::UnsupportedMethod`] for a method outside the supported set
/// - [`ParseError::UnsupportedVersion`] for an empty version
/// - [`ParseError::CannotReadHeaders`] for a header line without a colon
/// - [`ParseError::InvalidContentLength`] when `Content-Length` is not a non-negative integer
/// - [`ParseError::TooLargeHeader`] when the head exceeds [`MAX_HEADER_BYTES`]
pub async fn read_request<R>(src: &mut R) -> Result<Option<HttpRequest<'_>>, ParseError>
where
    R: AsyncBufRead + Send + Sync + Unpin,
{
    let mut line = Vec::with_capacity(256);
    let mut head_size = 0;

    let n = read_line(src, &mut line, MAX_HEADER_BYTES).await.map_err(ParseError::cannot_read_request_line)?;
    if n == 0 {
        return Ok(None);
    }
    head_size += n;
    ensure!(n < MAX_HEADER_BYTES || ends_line(&line), ParseError::too_large_header(head_size, MAX_HEADER_BYTES));

    let request_line = std::str::from_utf8(trim_line(&line))
        .map_err(|e| ParseError::invalid_request_line(format!("{}: {e}", String::from_utf8_lossy(&line))))?;
    let tokens = request_line.split_whitespace().collect::<Vec<_>>();
    let &[method, target, version] = tokens.as_slice() else {
        return Err(ParseError::invalid_request_line(request_line));
    };

    let method = parse_method(method).ok_or_else(|| ParseError::unsupported_method(method))?;
    ensure!(!version.is_empty(), ParseError::UnsupportedVersion);
    let (target, version) = (target.to_string(), version.to_string());

    let mut headers = Headers::new();
    loop {
        let limit = MAX_HEADER_BYTES.saturating_sub(head_size);
        ensure!(limit > 0, ParseError::too_large_header(head_size, MAX_HEADER_BYTES));

        let n = read_line(src, &mut line, limit).await.map_err(ParseError::io)?;
        head_size += n;
        ensure!(n < limit || ends_line(&line), ParseError::too_large_header(head_size, MAX_HEADER_BYTES));

        let header_line = std::str::from_utf8(&line)
            .map_err(|e| ParseError::cannot_read_headers(format!("header line is not valid utf-8: {e}")))?
            .trim();
        // a blank line, or the end of the stream, closes the header section
        if header_line.is_empty() {
            break;
        }

        let (name, value) =
            header_line.split_once(':').ok_or_else(|| ParseError::cannot_read_headers(format!("missing colon in {header_line:?}")))?;
        headers.insert(name.trim(), value.trim());
    }

    let body = match headers.get(CONTENT_LENGTH) {
        Some(value) => {
            let length =
                value.parse::<u64>().map_err(|e| ParseError::invalid_content_length(format!("value {value} is not u64: {e}")))?;
            if length == 0 { ReqBody::empty() } else { ReqBody::with_length(src, length) }
        }
        None => ReqBody::empty(),
    };

    trace!(
        method = %method,
        uri = %target,
        version = %version,
        header_count = headers.len(),
        body_size = body.remaining(),
        "parsed request head"
    );
    Ok(Some(HttpRequest::new(method, target, version, headers, body)))
}

/// Reads bytes up to and including the next `\n`, but no more than `limit` bytes.
///
/// Returns how many bytes were taken off the stream, 0 at end of stream.
async fn read_line<R>(src: &mut R, line: &mut Vec<u8>, limit: usize) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    line.clear();
    let mut limited = (&mut *src).take(limit as u64);
    limited.read_until(b'\n', line).await
}

fn ends_line(line: &[u8]) -> bool {
    line.last() == Some(&b'\n')
}

fn trim_line(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
