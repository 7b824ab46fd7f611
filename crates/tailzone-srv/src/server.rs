//! DNS server runner: binds UDP+TCP and serves peer zones.

use hickory_server::server::{RequestHandler, ServerFuture};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tailzone_client::StatusSource;
use tokio::net::{TcpListener, UdpSocket};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::engine::Engine;
use crate::handler::PeerDnsHandler;

/// TCP connection timeout for DNS queries.
const TCP_TIMEOUT: Duration = Duration::from_secs(30);

/// Bind the UDP socket and TCP listener for `addr`.
pub async fn bind(addr: SocketAddr) -> crate::Result<(UdpSocket, TcpListener)> {
    let udp_socket = UdpSocket::bind(addr)
        .await
        .map_err(|e| crate::SrvError::Server(format!("UDP bind {addr}: {e}")))?;
    info!(addr = %addr, "UDP socket bound");

    let tcp_listener = TcpListener::bind(addr)
        .await
        .map_err(|e| crate::SrvError::Server(format!("TCP bind {addr}: {e}")))?;
    info!(addr = %addr, "TCP listener bound");

    Ok((udp_socket, tcp_listener))
}

/// Serve `handler` on already-bound sockets until `shutdown` resolves.
pub async fn serve<H, F>(
    handler: H,
    udp_socket: UdpSocket,
    tcp_listener: TcpListener,
    shutdown: F,
) -> crate::Result<()>
where
    H: RequestHandler,
    F: Future<Output = ()>,
{
    let mut server = ServerFuture::new(handler);
    server.register_socket(udp_socket);
    server.register_listener(tcp_listener, TCP_TIMEOUT);

    let shutdown_requested = tokio::select! {
        result = server.block_until_done() => {
            result.map_err(|e| crate::SrvError::Server(format!("server error: {e}")))?;
            false
        }
        () = shutdown => true,
    };

    if shutdown_requested {
        info!("shutting down DNS server");
        server
            .shutdown_gracefully()
            .await
            .map_err(|e| crate::SrvError::Server(format!("shutdown error: {e}")))?;
    }

    Ok(())
}

/// Bind, start the engine and serve until `shutdown` resolves.
///
/// The refresh loop is stopped (and the store cleared) on the way out,
/// whether serving ended cleanly or not.
pub async fn run<S, F>(config: &ServerConfig, engine: &Engine<S>, shutdown: F) -> crate::Result<()>
where
    S: StatusSource + 'static,
    F: Future<Output = ()>,
{
    let (udp_socket, tcp_listener) = bind(config.listen).await?;
    let refresh = engine.start().await?;

    info!(
        addr = %config.listen,
        zones = ?engine.zones().names(),
        ready = engine.ready(),
        "tailzone DNS server running"
    );

    let handler = PeerDnsHandler::new(engine.resolver());
    let result = serve(handler, udp_socket, tcp_listener, shutdown).await;

    refresh.stop().await;
    result
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl-C"),
        Err(e) => warn!(error = %e, "failed to listen for Ctrl-C; shutting down"),
    }
}
