//! Core HTTP protocol types.
//!
//! This module holds the data model shared by the codec, the connection and
//! the user handlers.
//!
//! # Components
//!
//! - **Headers** ([`headers`]): case-insensitive field storage
//!   - [`Headers`]: lower-cased names, comma-joined repeats, single line parser
//!
//! - **Request** ([`request`]): the parsed request and its state machine
//!   - [`Request`]: request line, headers, body and content length
//!   - [`RequestLine`]: method, target and version
//!   - [`ParseState`]: which section of the wire format comes next
//!
//! - **Response** ([`response`]): what gets written back
//!   - [`Response`]: status, headers and body
//!   - [`default_headers`]: `Content-Length`, `Connection: close`, `Content-Type`
//!
//! - **Errors** ([`error`])
//!   - [`HttpError`]: top-level connection error
//!   - [`ParseError`]: request parsing errors
//!   - [`SendError`]: response sending errors

mod headers;
pub use headers::Headers;

mod request;
pub(crate) use request::ParseEvent;
pub use request::ParseState;
pub use request::Request;
pub use request::RequestLine;

mod response;
pub use response::Response;
pub use response::default_headers;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
