use docserve::config::Config;
use docserve::server::{wait_for_signal, Server, Shutdown};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let shutdown = Shutdown::new();
    let server = Server::bind(&cfg, shutdown.clone())?;

    let port = server.local_addr()?.port();
    tracing::info!(root = %cfg.static_files.root.display(), "Server is running on http://localhost:{}", port);

    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                shutdown.trigger();
            }
            Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
        }
    });

    server.run().await?;

    tracing::info!("Server has been shut down");
    Ok(())
}
