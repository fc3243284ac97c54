//! HTTP header serialization for responses.
//!
//! # Components
//!
//! - [`write_status_line`]: `HTTP/1.1 {code} {reason}\r\n`
//! - [`write_headers`]: one `{name}: {value}\r\n` line per header
//! - [`reason_phrase`]: the fixed reason table

mod header_encoder;

pub use header_encoder::reason_phrase;
pub use header_encoder::write_headers;
pub use header_encoder::write_status_line;
