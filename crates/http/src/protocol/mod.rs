//! Message model of the server.
//!
//! - [`HttpRequest`] / [`ReqBody`]: a parsed request and its bounded body stream
//! - [`HttpResponse`]: the response a handler fills in, starting from the clean response
//! - [`Headers`]: the name/value mapping shared by both, ordered by name
//! - [`BodyLength`]: lazy length providers resolved by the writer
//! - [`HttpError`], [`ParseError`], [`SendError`]: errors for each direction
//!
//! These types carry no protocol logic of their own; the [`codec`](crate::codec) module
//! reads and writes them and the [`connection`](crate::connection) module drives the
//! exchange.

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;

pub mod headers;
pub use headers::Headers;

mod length;
pub use length::BodyLength;
pub use length::FileLength;

mod method;
pub use method::parse_method;

mod request;
pub use request::BodySource;
pub use request::HttpRequest;
pub use request::ReqBody;

mod response;
pub use response::HttpResponse;
pub use response::ResBody;

pub mod status;
