use std::io;

use tcp_http::server::ServerError;
use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("server error: {source}")]
    Server {
        #[from]
        source: ServerError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("failed to install the log subscriber: {source}")]
    Logging {
        #[from]
        source: SetGlobalDefaultError,
    },
}
