//! Cluck server daemon.
//!
//! Usage: `cluckd <address> <port>`. Log levels come from `RUST_LOG`.

use anyhow::Result;
use clap::Parser;
use cluck_server::ServerBuilder;
use std::net::{IpAddr, SocketAddr};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "cluckd", author, version, about = "Cluck messaging server", long_about = None)]
struct Cli {
    /// IP address to listen on.
    address: IpAddr,

    /// TCP port to listen on.
    port: u16,
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let (mut server, handle) = ServerBuilder::new()
        .bind(SocketAddr::new(cli.address, cli.port))
        .build();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
            handle.shutdown();
        }
    });

    server.run().await?;
    info!("Server stopped");
    Ok(())
}
