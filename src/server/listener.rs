//! Chat hub server
//!
//! Handles the TCP accept loop and hands each socket to the hub for the
//! WebSocket upgrade. This is the thin front door; everything interesting
//! happens in [`Hub`].

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};

use crate::error::Result;
use crate::hub::{Hub, HubConfig};
use crate::server::config::ServerConfig;

/// WebSocket chat hub server
pub struct HubServer {
    config: ServerConfig,
    hub: Arc<Hub<TcpStream>>,
}

impl HubServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        Self::with_hub_config(config, HubConfig::default())
    }

    /// Create a new server with custom hub configuration
    pub fn with_hub_config(config: ServerConfig, hub_config: HubConfig) -> Self {
        Self {
            config,
            hub: Arc::new(Hub::with_config(hub_config)),
        }
    }

    /// Get a reference to the hub
    pub fn hub(&self) -> &Arc<Hub<TcpStream>> {
        &self.hub
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// This method blocks until the server is shut down.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Chat hub listening");

        self.accept_loop(&listener).await
    }

    /// Run the server with graceful shutdown
    ///
    /// Stops accepting when `shutdown` completes, then evicts every
    /// connected peer.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Chat hub listening");

        let result = tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            result = self.accept_loop(&listener) => result,
        };

        self.hub.shutdown().await;

        result
    }

    async fn accept_loop(&self, listener: &TcpListener) -> Result<()> {
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_socket(socket, peer_addr).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    async fn handle_socket(&self, socket: TcpStream, peer_addr: SocketAddr) {
        if self.config.tcp_nodelay {
            if let Err(e) = socket.set_nodelay(true) {
                tracing::error!(error = %e, "Failed to configure socket");
                return;
            }
        }

        match self.hub.handle_upgrade(socket).await {
            Ok(id) => {
                tracing::debug!(peer = id, addr = %peer_addr, "Peer connected");
            }
            Err(e) => {
                tracing::warn!(addr = %peer_addr, error = %e, "Upgrade rejected");
            }
        }
    }
}
