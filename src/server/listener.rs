use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::{info, Instrument};

use crate::config::{Config, ServerConfig};
use crate::http::connection::Connection;
use crate::static_files::StaticFileHandler;

const LISTEN_BACKLOG: u32 = 1024;

/// Binds the listening socket with address reuse enabled.
pub async fn bind(cfg: &ServerConfig) -> anyhow::Result<TcpListener> {
    let listen_addr = cfg.listen_addr();
    let addr: SocketAddr = tokio::net::lookup_host(&listen_addr)
        .await
        .with_context(|| format!("Failed to resolve {}", listen_addr))?
        .next()
        .with_context(|| format!("No address found for {}", listen_addr))?;

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket
        .bind(addr)
        .with_context(|| format!("Failed to bind {}", addr))?;

    let listener = socket.listen(LISTEN_BACKLOG)?;
    info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Accepts connections forever, serving each one on its own task.
pub async fn serve(listener: TcpListener, cfg: &Config) -> anyhow::Result<()> {
    let handler = Arc::new(StaticFileHandler::from_config(&cfg.static_files));

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let handler = Arc::clone(&handler);
        let server_config = cfg.server.clone();
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, handler, &server_config);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
            }
            .instrument(tracing::info_span!("connection", %peer)),
        );
    }
}

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = bind(&cfg.server).await?;
    serve(listener, cfg).await
}
