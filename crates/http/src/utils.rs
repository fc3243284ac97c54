//! Utility macros and functions for the HTTP crate.
//!
//! This module provides helper macros and functions that are used internally
//! by the HTTP crate implementation.

/// The line terminator of the request line, header lines and status line.
pub(crate) const CRLF: &[u8] = b"\r\n";

/// A macro for early returns with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
/// It's useful for validation checks where you want to return early with an error
/// if some condition is not satisfied.
///
/// # Arguments
///
/// * `$predicate` - A boolean expression that should evaluate to true
/// * `$error` - The error value to return if the predicate is false
///
/// # Example
///
/// ```ignore
/// ensure!(fields.len() == 3, ParseError::malformed_request_line(fields.len()));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

/// Returns the index of the first `\r\n` in `buf`, if any.
#[inline]
pub(crate) fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(CRLF.len()).position(|window| window == CRLF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_first_crlf() {
        assert_eq!(find_crlf(b"GET / HTTP/1.1\r\nHost: a\r\n"), Some(14));
        assert_eq!(find_crlf(b"\r\n"), Some(0));
        assert_eq!(find_crlf(b"GET / HTTP/1.1\r"), None);
        assert_eq!(find_crlf(b"\n\r"), None);
        assert_eq!(find_crlf(b""), None);
    }
}
