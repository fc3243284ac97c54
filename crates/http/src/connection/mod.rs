//! HTTP connection handling module
//!
//! This module reads requests off a connection and writes responses back.
//!
//! # Components
//!
//! - [`RequestReader`] / [`request_from_reader`]: parse one request from any
//!   `AsyncRead`, fed by a background read pump
//! - [`HttpConnection`]: one request/response cycle on a connection:
//!   - parses the request
//!   - answers `400 Bad Request` when that fails
//!   - runs the handler and writes its response
//!   - closes the connection
//!
//! Connections are never reused: every response carries `Connection: close`.

mod http_connection;
mod read_pump;
mod request_reader;

pub use http_connection::HttpConnection;
pub use request_reader::{DEFAULT_READ_CHUNK_SIZE, RequestReader, request_from_reader};
