//! HTTP response representation.
//!
//! Handlers always start from [`HttpResponse::new`], the clean response, and mutate it.
//! The body is any async byte stream; its length travels separately as a
//! [`BodyLength`] so that computing it can be deferred to the writer.

use std::fmt;
use std::io::Cursor;

use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::protocol::headers::CONTENT_TYPE;
use crate::protocol::{BodyLength, Headers, status};

pub type ResBody = Box<dyn AsyncRead + Send + Unpin>;

pub struct HttpResponse {
    version: String,
    status: u32,
    headers: Headers,
    body: Option<ResBody>,
    body_length: Option<Box<dyn BodyLength>>,
}

impl HttpResponse {
    /// The clean response: `HTTP/1.1 200`, no headers, no body.
    pub fn new() -> Self {
        Self { version: "HTTP/1.1".to_string(), status: status::OK, headers: Headers::new(), body: None, body_length: None }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = version.into();
        self
    }

    pub fn status(&self) -> u32 {
        self.status
    }

    pub fn set_status(&mut self, status: u32) -> &mut Self {
        self.status = status;
        self
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn set_body(&mut self, body: impl AsyncRead + Send + Unpin + 'static) -> &mut Self {
        self.body = Some(Box::new(body));
        self
    }

    pub fn take_body(&mut self) -> Option<ResBody> {
        self.body.take()
    }

    pub fn has_body_length(&self) -> bool {
        self.body_length.is_some()
    }

    pub fn set_body_length(&mut self, length: impl BodyLength + 'static) -> &mut Self {
        self.body_length = Some(Box::new(length));
        self
    }

    /// Removes the length provider. The writer calls this so a provider is resolved once.
    pub fn take_body_length(&mut self) -> Option<Box<dyn BodyLength>> {
        self.body_length.take()
    }

    /// Replaces the body with `text` as `text/plain`, along with its length.
    pub fn write_str(&mut self, text: impl Into<String>) -> &mut Self {
        let bytes = Bytes::from(text.into());
        let length = bytes.len() as u64;
        self.headers.insert(CONTENT_TYPE, mime::TEXT_PLAIN.as_ref());
        self.set_body(Cursor::new(bytes)).set_body_length(length)
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("version", &self.version)
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .field("has_body_length", &self.body_length.is_some())
            .finish()
    }
}
