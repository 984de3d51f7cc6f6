use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Framing errors raised while reading a request off the wire.
///
/// None of these is ever answered on the wire: the connection is torn down instead.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("cannot read request line: {source}")]
    CannotReadRequestLine { source: io::Error },

    #[error("invalid request line: {line:?}")]
    InvalidRequestLine { line: String },

    #[error("unsupported method: {method}")]
    UnsupportedMethod { method: String },

    #[error("unsupported version")]
    UnsupportedVersion,

    #[error("cannot read headers: {reason}")]
    CannotReadHeaders { reason: String },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn cannot_read_request_line<E: Into<io::Error>>(e: E) -> Self {
        Self::CannotReadRequestLine { source: e.into() }
    }

    pub fn invalid_request_line<S: ToString>(line: S) -> Self {
        Self::InvalidRequestLine { line: line.to_string() }
    }

    pub fn unsupported_method<S: ToString>(method: S) -> Self {
        Self::UnsupportedMethod { method: method.to_string() }
    }

    pub fn cannot_read_headers<S: ToString>(str: S) -> Self {
        Self::CannotReadHeaders { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Errors raised while writing a response. Both variants end the connection.
#[derive(Error, Debug)]
pub enum SendError {
    /// The body disagrees with the `Content-Length` that was already sent.
    #[error("invalid body after {written} bytes: {reason}")]
    InvalidBody { written: u64, reason: String },

    #[error("io error after {written} bytes: {source}")]
    Io { written: u64, source: io::Error },
}

impl SendError {
    pub fn invalid_body<S: ToString>(written: u64, reason: S) -> Self {
        Self::InvalidBody { written, reason: reason.to_string() }
    }

    pub fn io<E: Into<io::Error>>(written: u64, e: E) -> Self {
        Self::Io { written, source: e.into() }
    }

    /// Number of bytes handed to the output writer before the failure.
    ///
    /// The writer is buffered, so fewer bytes may have reached the peer.
    pub fn written(&self) -> u64 {
        match self {
            SendError::Io { written, .. } | SendError::InvalidBody { written, .. } => *written,
        }
    }
}

impl From<io::Error> for SendError {
    fn from(e: io::Error) -> Self {
        Self::io(0, e)
    }
}
