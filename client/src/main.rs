use clap::Parser;
use client::network::Client;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server WebSocket URL
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8888")]
    server: String,

    /// Move script to send after the first snapshot, e.g. "R U R' U'"
    #[arg(long)]
    script: Option<String>,

    /// Do not print the cube net
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting viewer...");
    info!("Type `help` for commands");

    let mut client = Client::connect(&args.server, args.quiet).await?;
    if let Some(script) = args.script {
        client.set_script(script);
    }

    client.run().await?;

    Ok(())
}
