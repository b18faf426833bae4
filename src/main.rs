//! udp2docker server binary.
//!
//! Reads configuration from the environment (`UDP_HOST`, `UDP_PORT`,
//! `STATS_INTERVAL_SECS`, `LOG_LEVEL`), binds the socket, and runs until
//! Ctrl-C.

use tracing_subscriber::EnvFilter;

use udp2docker::{Result, Server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        "starting udp2docker server"
    );

    let server = Server::bind(&config).await?;
    let shutdown = server.shutdown_handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down");
            shutdown.shutdown();
        }
    });

    server.run().await
}
