//! HTTP response head encoder
//!
//! Serializes the status line and header section of a [`HttpResponse`] into a byte
//! buffer. Headers come out in ascending name order, which is how [`Headers`] iterates.
//!
//! [`Headers`]: crate::protocol::Headers

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::protocol::status::reason_phrase;
use crate::protocol::{HttpResponse, SendError};

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// Encoder for the head of a response implementing the [`Encoder`] trait.
///
/// The status line is `<version> <status> <reason>\r\n`. The status number is written as
/// is, and the reason is empty for codes without a known phrase.
#[derive(Debug)]
pub struct HeaderEncoder;

impl<'a> Encoder<&'a HttpResponse> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, response: &'a HttpResponse, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);

        let status = response.status();
        write!(FastWrite(dst), "{} {} {}\r\n", response.version(), status, reason_phrase(status))?;

        for (name, value) in response.headers() {
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// This avoids going through an intermediate `String` for the formatted status line.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::status;

    fn encode(response: &HttpResponse) -> String {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode(response, &mut dst).unwrap();
        String::from_utf8(dst.to_vec()).unwrap()
    }

    #[test]
    fn status_line_only() {
        assert_eq!(encode(&HttpResponse::new()), "HTTP/1.1 200 OK\r\n\r\n");
    }

    #[test]
    fn headers_sorted_by_name() {
        let mut response = HttpResponse::new();
        response.set_status(status::NOT_FOUND);
        response.headers_mut().insert("B", "2");
        response.headers_mut().insert("A", "1");

        assert_eq!(encode(&response), "HTTP/1.1 404 Not Found\r\nA: 1\r\nB: 2\r\n\r\n");
    }

    #[test]
    fn unknown_status_is_written_verbatim() {
        let mut response = HttpResponse::new();
        response.set_status(1_234_567_890);

        assert_eq!(encode(&response), "HTTP/1.1 1234567890 \r\n\r\n");
    }

    #[test]
    fn empty_version() {
        let mut response = HttpResponse::new();
        response.set_version("").set_status(0);

        assert_eq!(encode(&response), " 0 \r\n\r\n");
    }
}
