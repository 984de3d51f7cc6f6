use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, trace};

use crate::codec::{read_request, write_response};
use crate::encoding::{encode_response, negotiate};
use crate::handler::Handler;
use crate::protocol::headers::{ACCEPT_ENCODING, CONNECTION};
use crate::protocol::{HttpError, HttpResponse, ParseError, SendError};

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// An HTTP connection that runs request/response exchanges until it has to close
///
/// Each exchange goes through the same steps:
/// - await a request; a framing error ends the connection without any response
/// - dispatch it to the handler together with a clean response
/// - negotiate the content encoding and the `Connection: close` request
/// - write the response; a write error ends the connection
///
/// Requests are handled strictly one after the other, so responses come out in request
/// order. The connection stays open after a response unless the client asked to close.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: BufReader<R>,
    writer: W,
}

/// What to do once a response is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    KeepAlive,
    Close,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Send + Sync + Unpin,
    W: AsyncWrite + Send + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader: BufReader::with_capacity(READ_BUFFER_SIZE, reader), writer }
    }

    /// Serves requests until the peer closes, asks to close, or an error occurs.
    ///
    /// Returns `Ok(())` when the connection ended normally, and the error that ended it
    /// otherwise. A malformed request never gets a response.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler + ?Sized,
    {
        loop {
            match self.exchange(handler.as_ref()).await? {
                Next::KeepAlive => trace!("keep connection alive for next request"),
                Next::Close => {
                    self.writer.shutdown().await.map_err(SendError::from)?;
                    return Ok(());
                }
            }
        }
    }

    async fn exchange<H>(&mut self, handler: &H) -> Result<Next, HttpError>
    where
        H: Handler + ?Sized,
    {
        let Some(mut request) = read_request(&mut self.reader).await? else {
            debug!("cant read more request, break this connection down");
            return Ok(Next::Close);
        };

        let mut response = HttpResponse::new();
        handler.handle(&mut request, &mut response).await;

        // skip body if request handler don't read body
        let skipped = request.body_mut().skip().await.map_err(ParseError::io)?;
        if skipped > 0 {
            trace!(skipped, "discarded unread request body");
        }

        let encodings = negotiate(request.header(ACCEPT_ENCODING));
        let close = request.header(CONNECTION).is_some_and(|value| value.eq_ignore_ascii_case("close"));
        let next = negotiate_response(&encodings, close, &mut response).await?;

        let written = write_response(&mut self.writer, &mut response).await?;
        info!(
            method = %request.method(),
            uri = request.target(),
            status = response.status(),
            bytes = written,
            "handled request"
        );

        Ok(next)
    }
}

/// Applies content encoding and mirrors a `Connection: close` request onto the response.
async fn negotiate_response(encodings: &[String], close: bool, response: &mut HttpResponse) -> Result<Next, SendError> {
    encode_response(encodings, response).await?;

    if close {
        response.headers_mut().insert(CONNECTION, "close");
        return Ok(Next::Close);
    }
    Ok(Next::KeepAlive)
}
