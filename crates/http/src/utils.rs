/// Returns early with `$error` unless `$predicate` holds.
///
/// ```ignore
/// ensure!(parts.len() == 3, ParseError::invalid_request_line(line));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
