//! A minimal HTTP/1.1 server built directly on TCP byte streams
//!
//! This crate parses HTTP/1.1 requests straight off the bytes a connection
//! delivers, without a pre-built HTTP stack. The core is an incremental request
//! parser that copes with reads splitting the message at any byte: mid request
//! line, mid header, mid body.
//!
//! # Features
//!
//! - Incremental request parsing, independent of read boundaries
//! - Background read pump handing chunks to the parser over a channel
//! - Case-insensitive headers, repeated fields joined with `", "`
//! - `Content-Length` framed request bodies
//! - One task per connection, one request per connection
//!
//! # Example
//!
//! ```no_run
//! use bytes::BufMut;
//! use tcp_http::handler::{HandlerError, make_handler};
//! use tcp_http::server::serve;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = serve(42069, make_handler(|w, request| {
//!         if request.target() == "/yourproblem" {
//!             return Err(HandlerError::bad_request("Your problem is not my problem\n"));
//!         }
//!         w.put_slice(b"All good, frfr\n");
//!         Ok(())
//!     }))
//!     .await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     server.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: headers, request, response and error types
//! - [`codec`]: request decoding and response encoding on byte buffers
//! - [`connection`]: read pump, request reader and the per-connection exchange
//! - [`handler`]: the user-supplied request handler
//! - [`server`]: the TCP accept loop
//!
//! # Limitations
//!
//! - HTTP/1.1 only, no TLS
//! - No chunked transfer encoding
//! - No keep-alive or pipelining: every response closes the connection

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;

pub use connection::request_from_reader;
pub use server::{Server, serve};
