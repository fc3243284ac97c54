use clap::Parser;
use tcp_http::server::serve_with_config;
use tcp_http_server::{AppError, ServerArgs, demo_handler, init_logging, shutdown_signal};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "httpserver", version, about = "Serves the demo routes over HTTP/1.1", long_about = None)]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.server.log_level)?;

    let server = serve_with_config(cli.server.server_config(), demo_handler()).await?;
    info!(port = cli.server.port, "server started");

    shutdown_signal().await?;
    server.close().await?;
    info!("server gracefully stopped");
    Ok(())
}
