//! Per-peer receive loop
//!
//! One task per live peer, spawned at upgrade time. The loop owns the
//! read half of the socket exclusively; the write half lives in the
//! registry entry. Whatever ends the loop (peer close, read error,
//! registry shutdown), the loop deregisters its own peer on the way out,
//! which is the sole eviction path under normal churn.

use std::sync::Arc;

use futures_util::stream::SplitStream;
use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::registry::{Frame, Peer, PeerRegistry};
use crate::stats::HubStats;

use super::fan_out;

/// Run one peer's receive loop until the connection ends
///
/// Each received frame is fanned out before the next read, which is what
/// gives per-sender delivery order.
pub(super) async fn run<S>(
    registry: Arc<PeerRegistry<S>>,
    stats: Arc<HubStats>,
    peer: Arc<Peer<S>>,
    mut reader: SplitStream<WebSocketStream<S>>,
    echo_to_sender: bool,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let id = peer.id();

    loop {
        match reader.next().await {
            Some(Ok(Message::Close(_))) | None => {
                tracing::debug!(peer = id, "Peer closed the connection");
                break;
            }
            Some(Ok(Message::Ping(payload))) => {
                if peer.send_message(Message::Pong(payload)).await.is_err() {
                    break;
                }
            }
            Some(Ok(Message::Pong(_))) => {}
            Some(Ok(msg)) => {
                if let Some(frame) = Frame::from_message(msg) {
                    stats.frame_received();
                    fan_out(&registry, &stats, id, frame, echo_to_sender).await;
                }
            }
            Some(Err(e)) => {
                tracing::debug!(peer = id, error = %e, "Read failed");
                break;
            }
        }
    }

    // No-op if a fan-out failure already evicted us
    registry.deregister(id).await;
    stats.connection_closed();
    tracing::debug!(peer = id, "Receive loop ended");
}
