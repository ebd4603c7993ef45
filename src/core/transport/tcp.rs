//! TCP transport implementation.
//!
//! Each accepted connection gets its own MCP session (line-delimited
//! JSON-RPC) on a separate task. All sessions share one server, so they
//! share the registry and the Komodo client.

use rmcp::ServiceExt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::McpServer;

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    /// Create a new TCP transport with the given config.
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Accept connections until the process is stopped.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.config.address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (MCP over TCP)", addr);

        let active = Arc::new(AtomicUsize::new(0));

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!("Failed to set TCP_NODELAY for {}: {}", peer, e);
                    }

                    let server = server.clone();
                    let active = active.clone();
                    tokio::spawn(async move {
                        let open = active.fetch_add(1, Ordering::SeqCst) + 1;
                        info!("Accepted connection from {} ({} open)", peer, open);
                        serve_connection(server, stream, peer).await;
                        active.fetch_sub(1, Ordering::SeqCst);
                    });
                }
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    // Avoid spinning on persistent accept errors (e.g. fd exhaustion)
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
            }
        }
    }
}

async fn serve_connection(server: McpServer, stream: TcpStream, peer: SocketAddr) {
    let service = match server.serve(stream).await {
        Ok(service) => service,
        Err(e) => {
            warn!("MCP handshake with {} failed: {}", peer, e);
            return;
        }
    };

    match service.waiting().await {
        Ok(reason) => info!("Client {} disconnected: {:?}", peer, reason),
        Err(e) => {
            warn!("Session with {} ended abnormally: {}", peer, e);
            debug!("Session error details: {:?}", e);
        }
    }
}
