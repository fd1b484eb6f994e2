//! Peer registry implementation
//!
//! The shared, mutable set of live peers. All mutation and snapshot reads
//! go through one `RwLock`, so membership changes are linearizable: no
//! reader ever observes a half-inserted entry, and concurrent removals of
//! the same id cannot both succeed.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::RwLock;

use super::entry::{Peer, PeerId, PeerWriter};
use super::error::RegistryError;

struct Inner<S> {
    /// Live peers, keyed by id. Ids are monotonic, so iteration order is
    /// insertion order.
    peers: BTreeMap<PeerId, Arc<Peer<S>>>,
    closed: bool,
}

/// Registry of all live peer connections
///
/// Fan-out never runs under the registry lock: [`snapshot`] copies the
/// membership under a brief critical section and the per-peer writes
/// happen against the returned handles, so a slow peer cannot stall
/// register/deregister or other readers.
///
/// [`snapshot`]: PeerRegistry::snapshot
pub struct PeerRegistry<S> {
    inner: RwLock<Inner<S>>,

    /// Next peer id to assign
    next_peer_id: AtomicU64,

    /// Maximum live peers (0 = unlimited)
    max_peers: usize,
}

impl<S> PeerRegistry<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a registry with no peer limit
    pub fn new() -> Self {
        Self::with_max_peers(0)
    }

    /// Create a registry admitting at most `max_peers` live peers (0 = unlimited)
    pub fn with_max_peers(max_peers: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                peers: BTreeMap::new(),
                closed: false,
            }),
            next_peer_id: AtomicU64::new(1),
            max_peers,
        }
    }

    /// Admit a new peer, assigning it a unique id
    ///
    /// Takes ownership of the socket's write half; the caller keeps the
    /// read half for the receive loop.
    pub async fn register(&self, writer: PeerWriter<S>) -> Result<Arc<Peer<S>>, RegistryError> {
        let mut inner = self.inner.write().await;

        if inner.closed {
            return Err(RegistryError::Closed);
        }
        if self.max_peers > 0 && inner.peers.len() >= self.max_peers {
            return Err(RegistryError::AtCapacity);
        }

        let id = self.next_peer_id.fetch_add(1, Ordering::Relaxed);
        let peer = Arc::new(Peer::new(id, writer));
        inner.peers.insert(id, Arc::clone(&peer));

        tracing::info!(peer = id, active = inner.peers.len(), "Peer registered");

        Ok(peer)
    }

    /// Remove a peer and release its transport
    ///
    /// Idempotent: removing an absent id is a no-op. The transport is
    /// released exactly once even when the receive loop and a fan-out
    /// failure path race here: only one caller wins the map removal.
    /// Returns whether this call evicted the peer.
    pub async fn deregister(&self, id: PeerId) -> bool {
        let peer = {
            let mut inner = self.inner.write().await;
            inner.peers.remove(&id)
        };

        match peer {
            Some(peer) => {
                // Release outside the lock; close can block on the writer
                peer.release().await;
                tracing::info!(peer = id, "Peer deregistered");
                true
            }
            None => false,
        }
    }

    /// Consistent point-in-time view of all live peers, in insertion order
    ///
    /// Safe to iterate with no registry lock held.
    pub async fn snapshot(&self) -> Vec<Arc<Peer<S>>> {
        self.inner.read().await.peers.values().cloned().collect()
    }

    /// Close the registry: evict and release every peer, refuse new ones
    pub async fn close(&self) {
        let drained = {
            let mut inner = self.inner.write().await;
            if inner.closed {
                return;
            }
            inner.closed = true;
            std::mem::take(&mut inner.peers)
        };

        let evicted = drained.len();
        for peer in drained.into_values() {
            peer.release().await;
        }

        tracing::info!(evicted = evicted, "Registry closed");
    }

    /// Whether `close` has been called
    pub async fn is_closed(&self) -> bool {
        self.inner.read().await.closed
    }

    /// Number of live peers
    pub async fn len(&self) -> usize {
        self.inner.read().await.peers.len()
    }

    /// Whether there are no live peers
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<S> Default for PeerRegistry<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::DuplexStream;
    use tokio_tungstenite::WebSocketStream;

    use crate::testutil::ws_server_halves;

    use super::*;

    /// Registers a fresh peer; the returned client end must stay alive for
    /// as long as the peer should look healthy.
    async fn register_one(
        registry: &PeerRegistry<DuplexStream>,
    ) -> (Arc<Peer<DuplexStream>>, WebSocketStream<DuplexStream>) {
        let (writer, _reader, client) = ws_server_halves().await;
        (registry.register(writer).await.unwrap(), client)
    }

    #[tokio::test]
    async fn test_register_assigns_unique_ids() {
        let registry = PeerRegistry::new();

        let (a, _ca) = register_one(&registry).await;
        let (b, _cb) = register_one(&registry).await;

        assert_ne!(a.id(), b.id());
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_live_set_tracks_churn() {
        let registry = PeerRegistry::new();

        let (a, _ca) = register_one(&registry).await;
        let (b, _cb) = register_one(&registry).await;
        let (c, _cc) = register_one(&registry).await;

        registry.deregister(b.id()).await;

        let ids: Vec<PeerId> = registry.snapshot().await.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![a.id(), c.id()]);
    }

    #[tokio::test]
    async fn test_snapshot_is_insertion_ordered() {
        let registry = PeerRegistry::new();

        let mut expected = Vec::new();
        let mut clients = Vec::new();
        for _ in 0..5 {
            let (peer, client) = register_one(&registry).await;
            expected.push(peer.id());
            clients.push(client);
        }

        let ids: Vec<PeerId> = registry.snapshot().await.iter().map(|p| p.id()).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_deregister_is_idempotent() {
        let registry = PeerRegistry::new();
        let (peer, _client) = register_one(&registry).await;

        assert!(registry.deregister(peer.id()).await);
        assert!(!registry.deregister(peer.id()).await);
        assert!(!registry.deregister(9999).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_deregister_evicts_once() {
        let registry = Arc::new(PeerRegistry::new());
        let (peer, _client) = register_one(&registry).await;
        let id = peer.id();

        let (a, b) = tokio::join!(registry.deregister(id), registry.deregister(id));

        assert!(a ^ b);
        assert!(peer.is_released());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_close_evicts_everyone_and_refuses_registration() {
        let registry = PeerRegistry::new();
        let (a, _ca) = register_one(&registry).await;
        let (b, _cb) = register_one(&registry).await;

        registry.close().await;

        assert!(registry.is_closed().await);
        assert!(registry.snapshot().await.is_empty());
        assert!(a.is_released());
        assert!(b.is_released());

        let (writer, _reader, _client) = ws_server_halves().await;
        let result = registry.register(writer).await;
        assert_eq!(result.err(), Some(RegistryError::Closed));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let registry = PeerRegistry::<DuplexStream>::new();

        registry.close().await;
        registry.close().await;

        assert!(registry.is_closed().await);
    }

    #[tokio::test]
    async fn test_capacity_bound() {
        let registry = PeerRegistry::with_max_peers(2);

        let (a, _ca) = register_one(&registry).await;
        let (_b, _cb) = register_one(&registry).await;

        let (writer, _reader, _client) = ws_server_halves().await;
        let result = registry.register(writer).await;
        assert_eq!(result.err(), Some(RegistryError::AtCapacity));

        // Eviction frees a slot
        registry.deregister(a.id()).await;
        let (_c, _cc) = register_one(&registry).await;
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_interleaved_churn_converges() {
        let registry = PeerRegistry::new();

        let ((a, _ca), (b, _cb), (c, _cc)) = tokio::join!(
            register_one(&registry),
            register_one(&registry),
            register_one(&registry),
        );

        let mut ids = vec![a.id(), b.id(), c.id()];
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert_eq!(registry.len().await, 3);

        // Concurrent removals of distinct peers both land
        let (da, db) = tokio::join!(registry.deregister(a.id()), registry.deregister(b.id()));
        assert!(da && db);

        let live: Vec<PeerId> = registry.snapshot().await.iter().map(|p| p.id()).collect();
        assert_eq!(live, vec![c.id()]);
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let registry = PeerRegistry::new();

        let (first, _ca) = register_one(&registry).await;
        let first = first.id();
        registry.deregister(first).await;
        let (second, _cb) = register_one(&registry).await;

        assert!(second.id() > first);
    }
}
