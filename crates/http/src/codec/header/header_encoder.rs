//! Status line and header block serialization.
//!
//! These are plain formatting helpers over any [`Write`] sink. They keep no
//! state between calls; [`ResponseEncoder`](crate::codec::ResponseEncoder)
//! strings them together into a full response.

use std::io;
use std::io::Write;

use http::StatusCode;

use crate::protocol::Headers;
use crate::utils::CRLF;

/// The reason phrase written after `code` on the status line.
///
/// Only the statuses this server produces itself have a phrase; any other code
/// gets an empty one.
pub fn reason_phrase(status: StatusCode) -> &'static str {
    match status {
        StatusCode::OK => "OK",
        StatusCode::BAD_REQUEST => "Bad Request",
        StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error",
        _ => "",
    }
}

/// Writes `HTTP/1.1 {code} {reason}\r\n`.
pub fn write_status_line<W: Write>(w: &mut W, status: StatusCode) -> io::Result<()> {
    write!(w, "HTTP/1.1 {} {}\r\n", status.as_u16(), reason_phrase(status))
}

/// Writes one `{name}: {value}\r\n` line per header, in no particular order.
pub fn write_headers<W: Write>(w: &mut W, headers: &Headers) -> io::Result<()> {
    for (name, value) in headers.iter() {
        w.write_all(name.as_str().as_bytes())?;
        w.write_all(b": ")?;
        w.write_all(value.as_bytes())?;
        w.write_all(CRLF)?;
    }
    Ok(())
}
