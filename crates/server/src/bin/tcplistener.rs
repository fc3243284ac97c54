use clap::Parser;
use tcp_http::connection::RequestReader;
use tcp_http_server::{AppError, ServerArgs, describe_request, init_logging, shutdown_signal};
use tokio::net::TcpListener;
use tokio::select;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "tcplistener", version, about = "Prints every HTTP request received on a TCP port", long_about = None)]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.server.log_level)?;

    let config = cli.server.server_config();
    let tcp_listener = TcpListener::bind(config.address()).await?;
    info!(address = %tcp_listener.local_addr()?, "start listening");

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    // connections are handled one at a time
    loop {
        let (tcp_stream, remote_addr) = select! {
            result = &mut shutdown => {
                result?;
                break;
            }
            accepted = tcp_listener.accept() => match accepted {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            },
        };

        println!("Accepted connection from {remote_addr}");
        let reader = RequestReader::with_chunk_size(tcp_stream, config.read_chunk_size());
        let parsed = select! {
            result = &mut shutdown => {
                result?;
                break;
            }
            parsed = reader.read_request() => parsed,
        };
        match parsed {
            Ok(request) => println!("{}", describe_request(&request)),
            Err(e) => warn!(%remote_addr, cause = %e, "failed to parse request"),
        }
        println!("Connection to {remote_addr} closed");
    }

    info!("listener stopped");
    Ok(())
}
