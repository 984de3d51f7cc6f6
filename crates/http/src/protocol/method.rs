use http::Method;

/// Maps a request-line method token to one of the nine supported methods.
///
/// The token is upper-cased first, so `get` and `Get` are accepted as `GET`.
/// Extension methods are not supported and yield `None`.
pub fn parse_method(token: &str) -> Option<Method> {
    let method = match token.to_ascii_uppercase().as_str() {
        "GET" => Method::GET,
        "HEAD" => Method::HEAD,
        "POST" => Method::POST,
        "PUT" => Method::PUT,
        "DELETE" => Method::DELETE,
        "CONNECT" => Method::CONNECT,
        "OPTIONS" => Method::OPTIONS,
        "TRACE" => Method::TRACE,
        "PATCH" => Method::PATCH,
        _ => return None,
    };
    Some(method)
}
