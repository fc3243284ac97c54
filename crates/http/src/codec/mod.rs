//! HTTP codec module for decoding requests and encoding responses
//!
//! Both directions are expressed as `tokio_util` codecs so they work on plain
//! [`BytesMut`](bytes::BytesMut) buffers, independent of where the bytes come
//! from or go to.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: incremental request parser driven by its parse state
//!   - header lines are parsed by [`Headers::parse`](crate::protocol::Headers::parse)
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: status line, headers, blank line, body
//!   - [`write_status_line`] / [`write_headers`]: the formatting helpers it uses
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use http::StatusCode;
//! use tcp_http::codec::{RequestDecoder, ResponseEncoder};
//! use tcp_http::protocol::Response;
//! use tokio_util::codec::{Decoder, Encoder};
//!
//! let mut request_buffer = BytesMut::from("GET / HTTP/1.1\r\nHost: localhost:42069\r\n\r\n");
//! let request = RequestDecoder::new().decode(&mut request_buffer).unwrap().unwrap();
//! assert_eq!(request.method(), "GET");
//!
//! let mut response_buffer = BytesMut::new();
//! ResponseEncoder::new().encode(Response::new(StatusCode::OK, "hi\n"), &mut response_buffer).unwrap();
//! assert!(response_buffer.ends_with(b"\r\n\r\nhi\n"));
//! ```

mod header;
mod request_decoder;
mod response_encoder;

pub use header::{reason_phrase, write_headers, write_status_line};
pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
