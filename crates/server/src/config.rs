use clap::Args;
use tcp_http::connection::DEFAULT_READ_CHUNK_SIZE;
use tcp_http::server::ServerConfig;
use tracing::Level;

pub const DEFAULT_PORT: u16 = 42069;

/// Arguments shared by every binary that listens on a port.
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Port to listen on, on every interface
    #[arg(short, long, env = "HTTP_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Buffer capacity of each read from a connection, in bytes
    #[arg(long, default_value_t = DEFAULT_READ_CHUNK_SIZE, value_parser = parse_chunk_size)]
    pub read_chunk_size: usize,

    /// Maximum level of the emitted logs
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl ServerArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.port).with_read_chunk_size(self.read_chunk_size)
    }
}

fn parse_chunk_size(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("read chunk size must be at least 1".to_owned()),
        Ok(size) => Ok(size),
        Err(e) => Err(e.to_string()),
    }
}
