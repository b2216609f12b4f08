//! TCP transport implementation.
//!
//! Line-delimited JSON-RPC over a raw TCP socket. Each connection gets its
//! own clone of the server handler; sessions and the tenant catalog are
//! shared across connections because the tool context lives behind an Arc.

use std::net::SocketAddr;
use std::time::Duration;

use rmcp::ServiceExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::McpServer;

/// Backoff before re-polling the listener after an accept failure.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// The address this transport binds to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Accept connections forever, one serving task per client.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (JSON-RPC over TCP)", addr);

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    // Tool responses are small; don't batch them up.
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!("failed to set TCP_NODELAY for {peer}: {e}");
                    }

                    let server = server.clone();
                    tokio::spawn(async move {
                        Self::serve_client(server, stream, peer).await;
                    });
                }
                Err(e) => {
                    warn!("failed to accept connection: {e}");
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                }
            }
        }
    }

    async fn serve_client(server: McpServer, stream: TcpStream, peer: SocketAddr) {
        let service = match server.serve(stream).await {
            Ok(service) => {
                info!("client {peer} connected, serving");
                service
            }
            Err(e) => {
                warn!("failed to initialize service for {peer}: {e}");
                return;
            }
        };

        if let Err(e) = service.waiting().await {
            warn!("error while serving client {peer}: {e}");
        } else {
            info!("client {peer} disconnected cleanly");
        }
    }
}
