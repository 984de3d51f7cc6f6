//! Content encoding negotiation
//!
//! [`negotiate`] turns an `Accept-Encoding` header value into the ordered list of tokens
//! the client listed. It is a pure string computation and knows nothing about the
//! connection.
//!
//! [`encode_response`] acts on that list. The only supported encoding is `gzip`; a
//! response is tagged with `Content-Encoding: gzip` only when its body really is
//! compressed, so responses without a body are left alone.

mod encoder;

use std::io;

use bytes::Bytes;
use tracing::debug;

use crate::protocol::HttpResponse;
use crate::protocol::headers::CONTENT_ENCODING;

pub const GZIP: &str = "gzip";

/// Splits an `Accept-Encoding` value on commas into trimmed, lower-cased tokens.
///
/// An absent or blank header yields an empty list. Tokens keep the order the client
/// sent them in, and parameters such as `;q=0.5` stay part of the token.
pub fn negotiate(accept_encoding: Option<&str>) -> Vec<String> {
    match accept_encoding {
        Some(value) if !value.trim().is_empty() => value.split(',').map(|token| token.trim().to_ascii_lowercase()).collect(),
        _ => Vec::new(),
    }
}

/// Returns true if `encoding` is one of the negotiated tokens.
pub fn accepts(tokens: &[String], encoding: &str) -> bool {
    tokens.iter().any(|token| token == encoding)
}

/// Compresses the response body when the client accepts gzip.
///
/// Nothing happens if gzip was not accepted, the response has no body, or a handler
/// already set a `Content-Encoding`. Otherwise the body is replaced by its compressed
/// form, the length provider by the compressed length, and `Content-Encoding: gzip` is
/// added. Returns whether the response was encoded.
///
/// # Errors
///
/// Fails if reading the original body fails.
pub async fn encode_response(tokens: &[String], response: &mut HttpResponse) -> io::Result<bool> {
    if !accepts(tokens, GZIP) {
        return Ok(false);
    }

    // response has already encoded
    if response.headers().contains(CONTENT_ENCODING) {
        return Ok(false);
    }

    let Some(mut body) = response.take_body() else {
        return Ok(false);
    };

    let encoded: Bytes = encoder::gzip(&mut body).await?;
    debug!(encoded_size = encoded.len(), "response body gzip encoded");

    response.take_body_length();
    let length = encoded.len() as u64;
    response.set_body(io::Cursor::new(encoded)).set_body_length(length);
    response.headers_mut().insert(CONTENT_ENCODING, GZIP);
    Ok(true)
}
