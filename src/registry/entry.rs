//! Peer connection entries
//!
//! A [`Peer`] is one live bidirectional link as the registry sees it: the
//! write half of the upgraded socket plus the identity and lifecycle
//! bookkeeping. The read half is owned exclusively by that peer's receive
//! loop and never passes through the registry.

use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::stream::SplitSink;
use futures_util::SinkExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::error::{HubError, Result};

use super::frame::Frame;

/// Unique identifier for a peer, assigned at registration
///
/// Monotonically increasing; never reused within a registry's lifetime.
/// A reconnecting client gets a fresh id.
pub type PeerId = u64;

/// Write half of an upgraded WebSocket
pub type PeerWriter<S> = SplitSink<WebSocketStream<S>, Message>;

/// One live peer connection
///
/// Writes are serialized through an internal mutex, so concurrent
/// broadcasts interleave whole frames, never bytes. The transport is
/// released at most once regardless of how many paths race to close it.
pub struct Peer<S> {
    id: PeerId,
    writer: Mutex<PeerWriter<S>>,
    released: AtomicBool,
}

impl<S> Peer<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(super) fn new(id: PeerId, writer: PeerWriter<S>) -> Self {
        Self {
            id,
            writer: Mutex::new(writer),
            released: AtomicBool::new(false),
        }
    }

    /// The identifier assigned at registration
    pub fn id(&self) -> PeerId {
        self.id
    }

    /// Whether the transport has been released
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Write one frame to this peer
    ///
    /// Blocks until the transport accepts the write. A failure here means
    /// the peer is gone or broken; callers evict it from the registry.
    pub async fn send(&self, frame: Frame) -> Result<()> {
        self.send_message(frame.into_message()).await
    }

    /// Write a raw transport message (pong replies, close frames)
    pub(crate) async fn send_message(&self, msg: Message) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.send(msg).await.map_err(HubError::Write)
    }

    /// Release the transport, at most once
    ///
    /// Sends a close frame on a best-effort basis and drops the write
    /// half. Returns whether this call performed the release; concurrent
    /// callers (receive loop vs. fan-out failure path) race on the flag
    /// and exactly one wins.
    pub(crate) async fn release(&self) -> bool {
        if self.released.swap(true, Ordering::AcqRel) {
            return false;
        }

        let mut writer = self.writer.lock().await;
        if let Err(e) = writer.close().await {
            tracing::trace!(peer = self.id, error = %e, "Close frame not delivered");
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;
    use tokio_test::assert_ok;

    use crate::testutil::ws_server_halves;

    use super::*;

    #[tokio::test]
    async fn test_send_reaches_peer() {
        let (writer, _reader, mut client) = ws_server_halves().await;
        let peer = Peer::new(1, writer);

        assert_ok!(peer.send(Frame::text("hi")).await);

        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg, Message::Text("hi".into()));
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let (writer, _reader, _client) = ws_server_halves().await;
        let peer = Peer::new(1, writer);

        assert!(!peer.is_released());
        assert!(peer.release().await);
        assert!(peer.is_released());
        assert!(!peer.release().await);
    }

    #[tokio::test]
    async fn test_concurrent_release_happens_once() {
        let (writer, _reader, _client) = ws_server_halves().await;
        let peer = std::sync::Arc::new(Peer::new(1, writer));

        let (a, b) = tokio::join!(peer.release(), peer.release());
        assert!(a ^ b);
    }

    #[tokio::test]
    async fn test_release_sends_close_frame() {
        let (writer, _reader, mut client) = ws_server_halves().await;
        let peer = Peer::new(1, writer);

        peer.release().await;

        let msg = client.next().await.unwrap().unwrap();
        assert!(msg.is_close());
    }

    #[tokio::test]
    async fn test_send_after_peer_vanishes_fails() {
        let (writer, _reader, client) = ws_server_halves().await;
        let peer = Peer::new(1, writer);
        drop(client);

        let result = peer.send(Frame::text("into the void")).await;
        assert!(matches!(result, Err(HubError::Write(_))));
    }
}
