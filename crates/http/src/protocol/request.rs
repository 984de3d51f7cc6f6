//! HTTP request representation.
//!
//! A request owns its line fields and headers, and borrows the connection's read side
//! for its body. The body is a bounded view over that stream: it yields exactly the
//! number of bytes the `Content-Length` header declared and never reads past them, so
//! the next request on the same connection starts at the right byte.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::{Bytes, BytesMut};
use http::Method;
use tokio::io::{AsyncBufRead, AsyncRead, AsyncReadExt, ReadBuf, Take};

use crate::protocol::Headers;

/// The read side of a connection, as seen by a request body.
pub type BodySource<'conn> = &'conn mut (dyn AsyncBufRead + Send + Sync + Unpin);

#[derive(Debug)]
pub struct HttpRequest<'conn> {
    method: Method,
    target: String,
    version: String,
    headers: Headers,
    body: ReqBody<'conn>,
}

impl<'conn> HttpRequest<'conn> {
    pub fn new(method: Method, target: impl Into<String>, version: impl Into<String>, headers: Headers, body: ReqBody<'conn>) -> Self {
        Self { method, target: target.into(), version: version.into(), headers, body }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request target exactly as it appeared on the request line.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> &ReqBody<'conn> {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut ReqBody<'conn> {
        &mut self.body
    }
}

/// Request payload, either empty or exactly `Content-Length` bytes of the connection.
pub struct ReqBody<'conn> {
    inner: Option<Take<BodySource<'conn>>>,
}

impl<'conn> ReqBody<'conn> {
    pub fn empty() -> Self {
        Self { inner: None }
    }

    pub fn with_length(source: BodySource<'conn>, length: u64) -> Self {
        Self { inner: Some(source.take(length)) }
    }

    /// Bytes still to be read from the connection for this body.
    pub fn remaining(&self) -> u64 {
        self.inner.as_ref().map_or(0, Take::limit)
    }

    pub fn is_end_stream(&self) -> bool {
        self.remaining() == 0
    }

    /// Discards whatever the handler left unread, returning how many bytes were dropped.
    pub async fn skip(&mut self) -> io::Result<u64> {
        if self.is_end_stream() {
            return Ok(0);
        }
        tokio::io::copy(self, &mut tokio::io::sink()).await
    }

    /// Reads the rest of the body into memory.
    pub async fn read_to_bytes(&mut self) -> io::Result<Bytes> {
        let mut buf = BytesMut::with_capacity(usize::try_from(self.remaining()).unwrap_or(usize::MAX).min(64 * 1024));
        while self.read_buf(&mut buf).await? != 0 {}
        Ok(buf.freeze())
    }
}

impl AsyncRead for ReqBody<'_> {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let Some(take) = &mut self.get_mut().inner else {
            return Poll::Ready(Ok(()));
        };

        let filled = buf.filled().len();
        ready!(Pin::new(&mut *take).poll_read(cx, buf))?;

        // the peer went away before sending everything Content-Length promised
        if buf.filled().len() == filled && buf.remaining() > 0 && take.limit() > 0 {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("connection closed with {} body bytes missing", take.limit()),
            )));
        }
        Poll::Ready(Ok(()))
    }
}

impl fmt::Debug for ReqBody<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqBody").field("remaining", &self.remaining()).finish()
    }
}
