//! The TCP accept loop.
//!
//! [`serve`] binds a listener and accepts connections on a background task.
//! Every accepted connection gets its own task running one
//! [`HttpConnection`] exchange, so a slow client never holds up the others.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::select;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::connection::{DEFAULT_READ_CHUNK_SIZE, HttpConnection};
use crate::handler::Handler;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("accept loop failed: {source}")]
    Join {
        #[from]
        source: JoinError,
    },
}

/// Where to listen and how connections are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    address: SocketAddr,
    read_chunk_size: usize,
}

impl ServerConfig {
    /// Listens on every interface at `port`.
    pub fn new(port: u16) -> Self {
        Self { address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)), read_chunk_size: DEFAULT_READ_CHUNK_SIZE }
    }

    #[must_use]
    pub fn with_address(mut self, address: SocketAddr) -> Self {
        self.address = address;
        self
    }

    #[must_use]
    pub fn with_read_chunk_size(mut self, read_chunk_size: usize) -> Self {
        self.read_chunk_size = read_chunk_size;
        self
    }

    /// The address the listener binds to.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn read_chunk_size(&self) -> usize {
        self.read_chunk_size
    }
}

/// A running server.
///
/// Dropping it leaves the accept loop running; call [`Server::close`] to stop it.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: CancellationToken,
    accept_loop: JoinHandle<()>,
}

/// Starts serving `handler` on every interface at `port`.
pub async fn serve<H>(port: u16, handler: H) -> Result<Server, ServerError>
where
    H: Handler + 'static,
{
    serve_with_config(ServerConfig::new(port), handler).await
}

pub async fn serve_with_config<H>(config: ServerConfig, handler: H) -> Result<Server, ServerError>
where
    H: Handler + 'static,
{
    let tcp_listener = match TcpListener::bind(config.address).await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return Err(e.into());
        }
    };

    let local_addr = tcp_listener.local_addr()?;
    info!(address = %local_addr, "start listening");

    let closed = Arc::new(AtomicBool::new(false));
    let shutdown = CancellationToken::new();
    let accept_loop = tokio::spawn(accept_loop(
        tcp_listener,
        Arc::new(handler),
        Arc::clone(&closed),
        shutdown.clone(),
        config.read_chunk_size,
    ));

    Ok(Server { local_addr, closed, shutdown, accept_loop })
}

async fn accept_loop<H>(
    tcp_listener: TcpListener,
    handler: Arc<H>,
    closed: Arc<AtomicBool>,
    shutdown: CancellationToken,
    read_chunk_size: usize,
) where
    H: Handler + 'static,
{
    loop {
        let accepted = select! {
            biased;
            () = shutdown.cancelled() => break,
            accepted = tcp_listener.accept() => accepted,
        };

        let (tcp_stream, remote_addr) = match accepted {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                if closed.load(Ordering::Acquire) {
                    break;
                }
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let handler = Arc::clone(&handler);

        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::with_chunk_size(reader, writer, read_chunk_size);
            match connection.process(handler).await {
                Ok(()) => {
                    info!(%remote_addr, "finished process, connection shutdown");
                }
                Err(e) => {
                    error!(%remote_addr, "service has error, cause {}, connection shutdown", e);
                }
            }
        });
    }

    info!("stop accepting connections");
}

impl Server {
    /// The address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stops accepting connections and waits for the listener to be dropped.
    ///
    /// Connections already being handled run to completion.
    pub async fn close(self) -> Result<(), ServerError> {
        self.closed.store(true, Ordering::Release);
        self.shutdown.cancel();
        self.accept_loop.await?;
        info!(address = %self.local_addr, "server closed");
        Ok(())
    }
}
