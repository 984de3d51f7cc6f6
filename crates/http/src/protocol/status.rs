//! Status codes used by the server and its handlers.
//!
//! Status values are plain integers: the writer emits whatever number a handler put in
//! the response, so there is no range validation here.

pub const OK: u32 = 200;
pub const CREATED: u32 = 201;
pub const BAD_REQUEST: u32 = 400;
pub const NOT_FOUND: u32 = 404;
pub const INTERNAL_SERVER_ERROR: u32 = 500;

/// Reason phrase written after the code on the status line, empty when unknown.
pub fn reason_phrase(status: u32) -> &'static str {
    match status {
        OK => "OK",
        CREATED => "Created",
        BAD_REQUEST => "Bad Request",
        NOT_FOUND => "Not Found",
        INTERNAL_SERVER_ERROR => "Internal Server Error",
        _ => "",
    }
}
