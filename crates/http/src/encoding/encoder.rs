use std::io;
use std::io::Write;

use bytes::{Bytes, BytesMut};
use flate2::Compression;
use flate2::write::GzEncoder;
use tokio::io::AsyncReadExt;
use tracing::trace;

use crate::protocol::ResBody;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// In-memory sink the compressor writes into.
#[derive(Debug, Default)]
pub(crate) struct Writer {
    buf: BytesMut,
}

impl Writer {
    fn new() -> Self {
        Self::default()
    }

    fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reads `body` to its end and returns it gzip compressed.
///
/// The whole compressed payload is kept in memory: its length has to be known before
/// the `Content-Length` header is written.
pub(crate) async fn gzip(body: &mut ResBody) -> io::Result<Bytes> {
    let mut encoder = GzEncoder::new(Writer::new(), Compression::default());
    let mut chunk = BytesMut::with_capacity(READ_CHUNK_SIZE);
    let mut read = 0u64;

    loop {
        chunk.clear();
        let n = body.read_buf(&mut chunk).await?;
        if n == 0 {
            break;
        }
        read += n as u64;
        encoder.write_all(&chunk).inspect_err(|e| trace!("error encoding gzip body: {e}"))?;
    }

    let bytes = encoder.finish()?.freeze();
    trace!(raw_size = read, encoded_size = bytes.len(), "gzip body encoded");
    Ok(bytes)
}
