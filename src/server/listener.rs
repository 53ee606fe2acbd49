use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::{error, info};

use crate::config::{Config, ServerConfig};
use crate::http::connection::Connection;
use crate::http::static_files::StaticFiles;
use crate::server::shutdown::Shutdown;

/// The listening socket and everything each connection needs.
pub struct Server {
    listener: TcpListener,
    files: Arc<StaticFiles>,
    linger: Duration,
    shutdown: Shutdown,
}

impl Server {
    /// Creates, binds and listens. Any failure here is fatal for the process.
    pub fn bind(cfg: &Config, shutdown: Shutdown) -> anyhow::Result<Self> {
        let listener = listen(&cfg.server)?;

        Ok(Self {
            listener,
            files: Arc::new(StaticFiles::new(cfg.static_files.clone())),
            linger: cfg.server.linger(),
            shutdown,
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts until shutdown is triggered, then closes the listening socket.
    ///
    /// Every connection gets its own detached task; there is no limit on how many
    /// run at once.
    pub async fn run(self) -> anyhow::Result<()> {
        let Server {
            listener,
            files,
            linger,
            shutdown,
        } = self;

        while shutdown.is_running() {
            let accepted = tokio::select! {
                biased;
                _ = shutdown.triggered() => break,
                res = listener.accept() => res,
            };

            let (socket, peer) = match accepted {
                Ok(conn) => conn,
                Err(e) if !shutdown.is_running() => {
                    info!("Accept interrupted by shutdown: {}", e);
                    break;
                }
                Err(e) => {
                    error!("Accept failed: {}", e);
                    continue;
                }
            };
            info!("Accepted connection from {}", peer);

            let files = Arc::clone(&files);
            tokio::spawn(async move {
                let conn = Connection::new(socket, peer, files, linger);
                if let Err(e) = conn.run().await {
                    error!("Connection error from {}: {}", peer, e);
                }
            });
        }

        drop(listener);
        info!("Listener closed");
        Ok(())
    }
}

fn listen(cfg: &ServerConfig) -> anyhow::Result<TcpListener> {
    let addr: SocketAddr = cfg
        .listen_addr
        .parse()
        .with_context(|| format!("invalid listen address {}", cfg.listen_addr))?;

    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4(),
        SocketAddr::V6(_) => TcpSocket::new_v6(),
    }
    .context("socket creation failed")?;

    socket
        .set_reuseaddr(true)
        .context("failed to enable address reuse")?;
    socket
        .bind(addr)
        .with_context(|| format!("binding {} failed", addr))?;

    socket
        .listen(cfg.backlog)
        .with_context(|| format!("listening on {} failed", addr))
}
