//! TCP transport: one MCP session per accepted connection, JSON-RPC messages
//! delimited by newlines.

use std::net::SocketAddr;
use std::time::Duration;

use rmcp::ServiceExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::McpServer;

// Pause after a failed accept() before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Accept connections forever; each gets its own session on a clone of
    /// `server`, sharing the Canvas client and cache.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!(address = %addr, "Canvas MCP server listening (JSON-RPC over TCP)");

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        debug!(%peer, error = %e, "Could not set TCP_NODELAY");
                    }
                    tokio::spawn(Self::serve_connection(server.clone(), stream, peer));
                }
                Err(e) => {
                    warn!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }

    async fn serve_connection(server: McpServer, stream: TcpStream, peer: SocketAddr) {
        info!(%peer, "Client connected");

        let service = match server.serve(stream).await {
            Ok(service) => service,
            Err(e) => {
                warn!(%peer, error = %e, "MCP handshake failed");
                return;
            }
        };

        match service.waiting().await {
            Ok(reason) => info!(%peer, ?reason, "Client disconnected"),
            Err(e) => warn!(%peer, error = %e, "Session ended with an error"),
        }
    }
}
