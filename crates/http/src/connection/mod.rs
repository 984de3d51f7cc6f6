//! Connection handling
//!
//! [`HttpConnection`] owns both halves of one client connection and runs the
//! request/response exchanges on it one after the other:
//!
//! - reads a request; end of input before a new request closes the connection quietly
//! - dispatches it to the [`Handler`](crate::handler::Handler)
//! - drains any request body the handler left unread
//! - applies content encoding and `Connection: close`
//! - writes the response
//!
//! A malformed request or a failed write ends the connection with an error and no
//! further output.

mod http_connection;

pub use http_connection::HttpConnection;
