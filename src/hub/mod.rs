//! Broadcast hub
//!
//! The hub accepts connection-upgrade events, runs one receive loop per
//! peer, and fans every received frame out to every other live peer
//! through the registry. Per-peer failure never escalates: a peer whose
//! read fails loses its receive loop, a peer whose write fails is evicted
//! from the fan-out, and everyone else keeps chatting.

pub mod config;
mod session;

pub use config::HubConfig;

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::accept_async;

use crate::error::{HubError, Result};
use crate::registry::{Frame, PeerId, PeerRegistry};
use crate::stats::HubStats;

/// Broadcast hub over a set of live WebSocket peers
///
/// Generic over the underlying I/O so production runs on
/// `tokio::net::TcpStream` and tests on in-memory duplex pipes.
pub struct Hub<S> {
    registry: Arc<PeerRegistry<S>>,
    stats: Arc<HubStats>,
    config: HubConfig,
}

impl<S> Hub<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Create a hub with default configuration
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a hub with custom configuration
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            registry: Arc::new(PeerRegistry::with_max_peers(config.max_peers)),
            stats: HubStats::new(),
            config,
        }
    }

    /// Get a reference to the peer registry
    pub fn registry(&self) -> &Arc<PeerRegistry<S>> {
        &self.registry
    }

    /// Get the hub statistics
    pub fn stats(&self) -> &Arc<HubStats> {
        &self.stats
    }

    /// Get the hub configuration
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Accept an upgrade event: complete the WebSocket handshake, register
    /// the peer, and start its receive loop
    ///
    /// On handshake failure nothing is registered and no loop starts. On
    /// registration failure (hub shut down or at capacity) the upgraded
    /// socket is dropped, which hangs up on the peer.
    pub async fn handle_upgrade(&self, stream: S) -> Result<PeerId> {
        let ws = accept_async(stream).await.map_err(HubError::Upgrade)?;
        let (writer, reader) = ws.split();

        let peer = self.registry.register(writer).await?;
        let id = peer.id();
        self.stats.connection_opened();

        tokio::spawn(session::run(
            Arc::clone(&self.registry),
            Arc::clone(&self.stats),
            peer,
            reader,
            self.config.echo_to_sender,
        ));

        Ok(id)
    }

    /// Fan a frame from `sender` out to every other live peer
    ///
    /// Under the default policy the sender is skipped; with
    /// [`HubConfig::echo_to_sender`] it receives its own frame too.
    pub async fn broadcast(&self, sender: PeerId, frame: Frame) {
        fan_out(
            &self.registry,
            &self.stats,
            sender,
            frame,
            self.config.echo_to_sender,
        )
        .await;
    }

    /// Shut the hub down: evict every peer and refuse new upgrades
    pub async fn shutdown(&self) {
        self.registry.close().await;
    }
}

impl<S> Default for Hub<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Write `frame` to every peer in the current snapshot except the sender
/// (unless echoing)
///
/// A failed write evicts exactly that peer and the fan-out moves on; the
/// frame still reaches every remaining peer. Runs outside the registry
/// lock, so registrations and other receive loops proceed concurrently.
async fn fan_out<S>(
    registry: &PeerRegistry<S>,
    stats: &HubStats,
    sender: PeerId,
    frame: Frame,
    echo_to_sender: bool,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let peers = registry.snapshot().await;

    for peer in peers {
        if peer.id() == sender && !echo_to_sender {
            continue;
        }

        match peer.send(frame.clone()).await {
            Ok(()) => {
                stats.frame_sent();
            }
            Err(e) => {
                stats.send_failure();
                tracing::warn!(peer = peer.id(), error = %e, "Write failed, evicting peer");
                registry.deregister(peer.id()).await;
            }
        }
    }
}
