//! HTTP codec module for reading requests and writing responses
//!
//! - [`read_request`]: parses a request head off a buffered stream and hands back a
//!   body bounded by `Content-Length`
//! - [`write_response`]: serializes a response, resolving its length provider first
//! - [`HeaderEncoder`]: the status line and header encoder used by the writer
//!
//! # Example
//!
//! ```no_run
//! use wire_http::codec::{read_request, write_response};
//! use wire_http::protocol::HttpResponse;
//! use tokio::io::BufReader;
//! use tokio::net::TcpStream;
//!
//! # async fn run(stream: TcpStream) -> Result<(), wire_http::protocol::HttpError> {
//! let (reader, mut writer) = stream.into_split();
//! let mut reader = BufReader::new(reader);
//!
//! if let Some(request) = read_request(&mut reader).await? {
//!     let mut response = HttpResponse::new();
//!     response.write_str(request.target());
//!     write_response(&mut writer, &mut response).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod header_encoder;
mod request_reader;
mod response_writer;

pub use header_encoder::HeaderEncoder;
pub use request_reader::MAX_HEADER_BYTES;
pub use request_reader::read_request;
pub use response_writer::write_response;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Headers, HttpResponse, status};
    use bytes::Bytes;
    use indoc::indoc;
    use std::io::Cursor;

    /// Splits written response bytes into status line, headers and body.
    fn split_response(out: &[u8]) -> (String, Headers, Vec<u8>) {
        let head_end = out.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let head = std::str::from_utf8(&out[..head_end]).unwrap();
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap().to_string();
        let headers = lines.map(|line| line.split_once(": ").unwrap()).collect::<Headers>();
        (status_line, headers, out[head_end + 4..].to_vec())
    }

    #[tokio::test]
    async fn request_round_trips_into_response() {
        let wire = indoc! {"
            POST /files/notes HTTP/1.1
            Host: localhost:4221
            User-Agent: curl/8.5.0
            Content-Type: application/octet-stream
            Content-Length: 11

            hello world"}
        .replace('\n', "\r\n");

        let mut src = wire.as_bytes();
        let (headers, body): (Headers, Bytes) = {
            let mut request = read_request(&mut src).await.unwrap().unwrap();
            (request.headers().clone(), request.body_mut().read_to_bytes().await.unwrap())
        };
        assert!(src.is_empty());
        assert_eq!(body, "hello world");

        let mut response = HttpResponse::new();
        response.set_status(status::CREATED);
        for (name, value) in &headers {
            response.headers_mut().insert(name, value);
        }
        response.set_body(Cursor::new(body.clone())).set_body_length(body.len() as u64);

        let mut out = Vec::new();
        let written = write_response(&mut out, &mut response).await.unwrap();

        let (status_line, echoed_headers, echoed_body) = split_response(&out);
        assert_eq!(written, out.len() as u64);
        assert_eq!(status_line, "HTTP/1.1 201 Created");
        assert_eq!(echoed_headers, headers);
        assert_eq!(echoed_body, body);
    }
}
