use clap::Parser;
use log::{error, info};
use server::network::{Server, ServerMessage};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = shared::DEFAULT_PORT)]
    port: u16,

    /// Maximum number of simultaneous viewers
    #[arg(short, long, default_value = "64")]
    max_viewers: usize,

    /// Seed for piece ids and scrambles
    #[arg(short, long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let address = format!("{}:{}", args.host, args.port);
    info!("Starting cube server on {}", address);
    if let Some(seed) = args.seed {
        info!("Using seed {}", seed);
    }

    let server = Server::new(&address, args.max_viewers, args.seed).await?;
    let shutdown = server.shutdown_sender();
    let mut server_handle = tokio::spawn(server.run());

    tokio::select! {
        result = &mut server_handle => {
            match result {
                Ok(Err(e)) => error!("Server stopped: {}", e),
                Err(e) => error!("Server task panicked: {}", e),
                Ok(Ok(())) => {}
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
            let _ = shutdown.send(ServerMessage::Shutdown);
            server_handle.await??;
        }
    }

    Ok(())
}
