//! A from-scratch HTTP/1.1 message engine and keep-alive connection server
//!
//! The crate reads requests off raw byte streams, hands them to a single pluggable
//! [`Handler`](handler::Handler), and writes the responses back, serving any number of
//! requests per connection until the client asks to close or goes away.
//!
//! # Example
//!
//! ```no_run
//! use wire_http::handler::handler_fn;
//! use wire_http::server::Server;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let handler = handler_fn(|request, response| {
//!         response.write_str(format!("you asked for {}", request.target()));
//!     });
//!
//!     let server = Server::builder()
//!         .address("127.0.0.1:4221")
//!         .handler(handler)
//!         .build()
//!         .map_err(std::io::Error::other)?;
//!
//!     server.start().await
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: requests, responses, headers, status codes and errors
//! - [`codec`]: the request reader and the response writer
//! - [`encoding`]: `Accept-Encoding` negotiation and gzip bodies
//! - [`handler`]: the dispatcher trait
//! - [`connection`]: the per-connection request/response loop
//! - [`server`]: the listening socket and accept loop
//!
//! # Limitations
//!
//! - HTTP/1.1 framing by `Content-Length` only, no chunked transfer encoding
//! - No TLS support (use a reverse proxy for HTTPS)
//! - Maximum request head size: 8KB

pub mod codec;
pub mod connection;
pub mod encoding;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
