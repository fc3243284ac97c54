//! Process entry points for the `tcp-http` server.
//!
//! Shared pieces of the `httpserver` and `tcplistener` binaries: command line
//! arguments, logging setup, the demo routes and signal handling.

mod config;
mod error;
mod logging;
mod routes;
mod signal;

pub use config::ServerArgs;
pub use error::AppError;
pub use logging::init_logging;
pub use routes::{RequestReport, demo_handler, describe_request};
pub use signal::shutdown_signal;
