//! HTTP response writer
//!
//! Writes a whole [`HttpResponse`] to an output stream:
//!
//! 1. resolves the body length provider, if any, into a `Content-Length` header
//! 2. encodes the status line and the sorted headers with [`HeaderEncoder`]
//! 3. streams the body chunk by chunk
//! 4. flushes once at the end
//!
//! The length has to be resolved first because headers precede the body on the wire and
//! cannot be amended once written. A body that then turns out shorter or longer than the
//! declared length is rejected with [`SendError::InvalidBody`]; the excess is never
//! written, so the peer cannot mistake it for the next response.

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::codec::HeaderEncoder;
use crate::ensure;
use crate::protocol::headers::CONTENT_LENGTH;
use crate::protocol::{HttpResponse, SendError};

const WRITE_BUFFER_SIZE: usize = 8 * 1024;
const BODY_CHUNK_SIZE: usize = 8 * 1024;

/// Serializes `response` into `dst`, returning the number of bytes written.
///
/// The body and the length provider are taken out of the response; the resolved
/// `Content-Length` is left in its headers.
///
/// # Errors
///
/// Any failure resolving the length, reading the body or writing aborts the response
/// with [`SendError::Io`], which carries the number of bytes handed to the output before
/// the failure. A body whose size differs from the resolved length aborts it with
/// [`SendError::InvalidBody`].
pub async fn write_response<W>(dst: &mut W, response: &mut HttpResponse) -> Result<u64, SendError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut declared = None;
    if let Some(body_length) = response.take_body_length() {
        let length = body_length.resolve_length().await.map_err(|e| SendError::io(0, e))?;
        response.headers_mut().insert(CONTENT_LENGTH, length.to_string());
        declared = Some(length);
    }

    let mut head = BytesMut::new();
    HeaderEncoder.encode(&*response, &mut head)?;

    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, dst);
    let mut written = 0u64;

    writer.write_all(&head).await.map_err(|e| SendError::io(written, e))?;
    written += head.len() as u64;

    let mut body_size = 0u64;
    if let Some(mut body) = response.take_body() {
        let mut chunk = BytesMut::with_capacity(BODY_CHUNK_SIZE);
        loop {
            chunk.clear();
            let n = body.read_buf(&mut chunk).await.map_err(|e| SendError::io(written, e))?;
            if n == 0 {
                break;
            }
            body_size += n as u64;
            if let Some(length) = declared {
                ensure!(
                    body_size <= length,
                    SendError::invalid_body(written, format!("body exceeds content-length {length}"))
                );
            }
            writer.write_all(&chunk).await.map_err(|e| SendError::io(written, e))?;
            written += n as u64;
        }
    }

    if let Some(length) = declared {
        ensure!(
            body_size == length,
            SendError::invalid_body(written, format!("body of {body_size} bytes is shorter than content-length {length}"))
        );
    }

    writer.flush().await.map_err(|e| SendError::io(written, e))?;
    trace!(status = response.status(), written, "response written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{BodyLength, status};
    use async_trait::async_trait;
    use std::io;
    use std::io::Cursor;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context, Poll};

    async fn write_to_string(response: &mut HttpResponse) -> (u64, String) {
        let mut out = Vec::new();
        let written = write_response(&mut out, response).await.unwrap();
        (written, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn clean_response() {
        let (written, out) = write_to_string(&mut HttpResponse::new()).await;

        assert_eq!(out, "HTTP/1.1 200 OK\r\n\r\n");
        assert_eq!(written, out.len() as u64);
    }

    #[tokio::test]
    async fn text_body_gets_content_length() {
        let mut response = HttpResponse::new();
        response.write_str("hi");

        let (written, out) = write_to_string(&mut response).await;

        assert_eq!(out, "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nContent-Type: text/plain\r\n\r\nhi");
        assert_eq!(written, out.len() as u64);
        assert_eq!(response.headers().get("Content-Length"), Some("2"));
    }

    #[tokio::test]
    async fn body_without_length_provider() {
        let mut response = HttpResponse::new();
        response.set_status(status::NOT_FOUND);
        response.headers_mut().insert("Content-Type", "text/html; charset=utf-8");
        response.set_body(Cursor::new("Hello, World!"));

        let (_, out) = write_to_string(&mut response).await;

        assert_eq!(out, "HTTP/1.1 404 Not Found\r\nContent-Type: text/html; charset=utf-8\r\n\r\nHello, World!");
    }

    #[tokio::test]
    async fn headers_in_ascending_order() {
        let mut response = HttpResponse::new();
        response.headers_mut().insert("B", "2");
        response.headers_mut().insert("A", "1");

        let (_, out) = write_to_string(&mut response).await;

        assert_eq!(out, "HTTP/1.1 200 OK\r\nA: 1\r\nB: 2\r\n\r\n");
    }

    #[tokio::test]
    async fn out_of_range_status() {
        let mut response = HttpResponse::new();
        response.set_status(1_234_567_890);

        let (_, out) = write_to_string(&mut response).await;

        assert_eq!(out, "HTTP/1.1 1234567890 \r\n\r\n");
    }

    #[tokio::test]
    async fn large_body_is_streamed_whole() {
        let body = "0123456789".repeat(5_000);
        let mut response = HttpResponse::new();
        response.write_str(body.clone());

        let (written, out) = write_to_string(&mut response).await;

        assert!(out.starts_with("HTTP/1.1 200 OK\r\nContent-Length: 50000\r\n"));
        assert!(out.ends_with(&body));
        assert_eq!(written, out.len() as u64);
    }

    struct CountingLength {
        length: u64,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BodyLength for CountingLength {
        async fn resolve_length(&self) -> io::Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.length)
        }
    }

    #[tokio::test]
    async fn length_provider_resolved_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut response = HttpResponse::new();
        response.set_body(Cursor::new(b"abcdef".to_vec()));
        response.set_body_length(CountingLength { length: 6, calls: Arc::clone(&calls) });

        let (_, out) = write_to_string(&mut response).await;

        assert_eq!(out, "HTTP/1.1 200 OK\r\nContent-Length: 6\r\n\r\nabcdef");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!response.has_body_length());
    }

    #[tokio::test]
    async fn failing_length_provider() {
        struct Broken;

        #[async_trait]
        impl BodyLength for Broken {
            async fn resolve_length(&self) -> io::Result<u64> {
                Err(io::Error::other("stat failed"))
            }
        }

        let mut response = HttpResponse::new();
        response.set_body_length(Broken);

        let mut out = Vec::new();
        let error = write_response(&mut out, &mut response).await.unwrap_err();

        assert_eq!(error.written(), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn body_longer_than_length_is_not_written() {
        let mut response = HttpResponse::new();
        response.set_body(Cursor::new(b"abcdef".to_vec())).set_body_length(3u64);

        let mut out = Vec::new();
        let error = write_response(&mut out, &mut response).await.unwrap_err();

        assert!(matches!(error, SendError::InvalidBody { .. }));
        assert_eq!(error.written(), "HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\n".len() as u64);
        assert!(!out.ends_with(b"abcdef"));
    }

    #[tokio::test]
    async fn body_shorter_than_length_is_invalid() {
        let mut response = HttpResponse::new();
        response.set_body(Cursor::new(b"ab".to_vec())).set_body_length(5u64);

        let mut out = Vec::new();
        let error = write_response(&mut out, &mut response).await.unwrap_err();

        assert!(matches!(error, SendError::InvalidBody { .. }));
        assert!(error.to_string().contains("shorter than content-length 5"));
    }

    #[tokio::test]
    async fn length_without_body_is_invalid() {
        let mut response = HttpResponse::new();
        response.set_body_length(4u64);

        let mut out = Vec::new();
        let error = write_response(&mut out, &mut response).await.unwrap_err();

        assert!(matches!(error, SendError::InvalidBody { .. }));
    }

    /// Accepts `capacity` bytes, then fails every write.
    struct ShortWriter {
        accepted: Vec<u8>,
        capacity: usize,
    }

    impl AsyncWrite for ShortWriter {
        fn poll_write(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
            let room = self.capacity - self.accepted.len();
            if room == 0 {
                return Poll::Ready(Err(io::Error::from(io::ErrorKind::BrokenPipe)));
            }
            let n = room.min(buf.len());
            self.accepted.extend_from_slice(&buf[..n]);
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn write_failure_reports_partial_count() {
        let mut response = HttpResponse::new();
        response.write_str("x".repeat(3 * WRITE_BUFFER_SIZE));

        let mut dst = ShortWriter { accepted: Vec::new(), capacity: 100 };
        let error = write_response(&mut dst, &mut response).await.unwrap_err();

        assert!(matches!(error, SendError::Io { .. }));
        assert!(error.written() > 0);
        assert!(error.written() < 3 * WRITE_BUFFER_SIZE as u64);
    }
}
