use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::info;

use crate::config::Config;
use crate::files::PathResolver;
use crate::http::connection::{Connection, ConnectionLimits};

/// Binds `addr` with `SO_REUSEADDR` set, so a restart does not have to wait
/// out TIME_WAIT on the old socket.
pub fn bind(addr: &str, backlog: u32) -> anyhow::Result<TcpListener> {
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("invalid listen address {}", addr))?;

    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.set_reuseaddr(true)?;
    socket
        .bind(addr)
        .with_context(|| format!("failed to bind {}", addr))?;

    Ok(socket.listen(backlog)?)
}

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let resolver = PathResolver::new(&cfg.static_files.root)?;
    let listener = bind(&cfg.server.listen_addr, cfg.server.backlog)?;

    info!(
        addr = %listener.local_addr()?,
        root = %resolver.root().display(),
        "Listening"
    );

    serve(listener, resolver, ConnectionLimits::from(&cfg.server)).await
}

/// Accepts and serves connections one at a time.
///
/// Each connection runs to completion before the next `accept`. A failed
/// connection is logged and dropped; only an accept failure ends the loop.
pub async fn serve(
    listener: TcpListener,
    resolver: PathResolver,
    limits: ConnectionLimits,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!(%peer, "Accepted connection");

        let mut conn = Connection::new(socket, &resolver, limits);
        if let Err(e) = conn.run().await {
            tracing::error!(%peer, error = %format!("{e:#}"), "Connection dropped");
        }
    }
}
